#[derive(PartialEq, Debug)]
pub enum EnsureTagError {
    /// an error with the database
    DbError,
    /// the folder name was blank once trimmed
    EmptyName,
    /// the parent tag the new tag should hang under does not exist
    ParentNotFound,
}

#[derive(PartialEq, Debug)]
pub enum CreateTagError {
    /// an error with the database
    DbError,
    /// the tag name was blank once trimmed
    EmptyName,
}

#[derive(PartialEq, Debug)]
pub enum GetTagError {
    /// an error with the database
    DbError,
    /// the tag was not found
    TagNotFound,
}
