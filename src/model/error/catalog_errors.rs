#[derive(PartialEq, Debug)]
pub enum UpsertResourceError {
    /// an error with the database
    DbError,
    /// the external file id was blank
    MissingExternalId,
}

#[derive(PartialEq, Debug)]
pub enum GetResourceError {
    /// an error with the database
    DbError,
    /// no resource with the passed id exists
    ResourceNotFound,
}

#[derive(PartialEq, Debug)]
pub enum ResourceTagError {
    /// an error with the database
    DbError,
    /// no resource with the passed id was found
    ResourceNotFound,
    /// no tag with the passed id was found
    TagNotFound,
}
