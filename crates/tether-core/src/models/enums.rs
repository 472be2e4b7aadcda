use serde::{Deserialize, Serialize};

/// Document types that participate in sync. A type missing here never leaves
/// the local database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentKind {
    Workspace,
    Request,
    RequestGroup,
    Environment,
    UnitTest,
    UnitTestSuite,
    CookieJar,
    ClientCertificate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeOp {
    Upsert,
    Remove,
}

#[repr(i32)]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "i32", into = "i32")]
pub enum SyncMode {
    Unset = 1,
    Active = 2,
    Paused = 3,
    Never = 4,
}

#[derive(Debug)]
pub struct EnumParseError {
    enum_name: &'static str,
    value: String,
}

impl EnumParseError {
    fn new(enum_name: &'static str, value: impl Into<String>) -> Self {
        Self {
            enum_name,
            value: value.into(),
        }
    }
}

impl std::fmt::Display for EnumParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid {} value: {}", self.enum_name, self.value)
    }
}

impl std::error::Error for EnumParseError {}

impl DocumentKind {
    pub const ALL: [Self; 8] = [
        Self::Workspace,
        Self::Request,
        Self::RequestGroup,
        Self::Environment,
        Self::UnitTest,
        Self::UnitTestSuite,
        Self::CookieJar,
        Self::ClientCertificate,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Workspace => "Workspace",
            Self::Request => "Request",
            Self::RequestGroup => "RequestGroup",
            Self::Environment => "Environment",
            Self::UnitTest => "UnitTest",
            Self::UnitTestSuite => "UnitTestSuite",
            Self::CookieJar => "CookieJar",
            Self::ClientCertificate => "ClientCertificate",
        }
    }

    #[must_use]
    pub const fn is_workspace(&self) -> bool {
        matches!(self, Self::Workspace)
    }
}

impl std::str::FromStr for DocumentKind {
    type Err = EnumParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Workspace" => Ok(Self::Workspace),
            "Request" => Ok(Self::Request),
            "RequestGroup" => Ok(Self::RequestGroup),
            "Environment" => Ok(Self::Environment),
            "UnitTest" => Ok(Self::UnitTest),
            "UnitTestSuite" => Ok(Self::UnitTestSuite),
            "CookieJar" => Ok(Self::CookieJar),
            "ClientCertificate" => Ok(Self::ClientCertificate),
            _ => Err(EnumParseError::new("document_kind", value)),
        }
    }
}

impl ChangeOp {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Upsert => "upsert",
            Self::Remove => "remove",
        }
    }
}

impl std::str::FromStr for ChangeOp {
    type Err = EnumParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "upsert" => Ok(Self::Upsert),
            "remove" => Ok(Self::Remove),
            _ => Err(EnumParseError::new("change_op", value)),
        }
    }
}

impl SyncMode {
    pub const UNSET: i32 = Self::Unset as i32;
    pub const ACTIVE: i32 = Self::Active as i32;
    pub const PAUSED: i32 = Self::Paused as i32;
    pub const NEVER: i32 = Self::Never as i32;

    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

impl From<SyncMode> for i32 {
    fn from(value: SyncMode) -> Self {
        value as i32
    }
}

impl TryFrom<i32> for SyncMode {
    type Error = EnumParseError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Unset),
            2 => Ok(Self::Active),
            3 => Ok(Self::Paused),
            4 => Ok(Self::Never),
            _ => Err(EnumParseError::new("sync_mode", value.to_string())),
        }
    }
}
