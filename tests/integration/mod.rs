//! Integration tests for affected-projects


mod test_affected;
mod test_files;
mod test_projects;
