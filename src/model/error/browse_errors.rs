#[derive(PartialEq, Debug)]
pub enum BrowseError {
    /// an error with the database
    DbError,
}
