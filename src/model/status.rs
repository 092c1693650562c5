use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::ToSql;
use serde::{Deserialize, Serialize};

/// who produced a tag or resource: the folder sync, or a person through the product
#[derive(Deserialize, Serialize, Debug, Eq, PartialEq, Hash, Copy, Clone)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordSource {
    System,
    User,
}

#[derive(Deserialize, Serialize, Debug, Eq, PartialEq, Hash, Copy, Clone)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceStatus {
    Pending,
    Approved,
    Rejected,
    Archived,
}

impl RecordSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "SYSTEM",
            Self::User => "USER",
        }
    }
}

impl ResourceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::Archived => "ARCHIVED",
        }
    }
}

impl From<&str> for RecordSource {
    fn from(value: &str) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "SYSTEM" => Self::System,
            "USER" => Self::User,
            _ => {
                log::warn!("record source from database {value} does not match any branches in RecordSource#from");
                Self::User
            }
        }
    }
}

impl From<&str> for ResourceStatus {
    fn from(value: &str) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "PENDING" => Self::Pending,
            "APPROVED" => Self::Approved,
            "REJECTED" => Self::Rejected,
            "ARCHIVED" => Self::Archived,
            _ => {
                log::warn!("resource status from database {value} does not match any branches in ResourceStatus#from");
                Self::Pending
            }
        }
    }
}

impl ToSql for RecordSource {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl ToSql for ResourceStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for RecordSource {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str().map(Self::from).map_err(|_| FromSqlError::InvalidType)
    }
}

impl FromSql for ResourceStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str().map(Self::from).map_err(|_| FromSqlError::InvalidType)
    }
}
