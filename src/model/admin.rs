use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug,
    Copy,
    Clone,
    Default,
    Eq,
    PartialEq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AdminRole {
    SuperAdmin,
    #[default]
    Admin,
    Viewer,
}

impl AdminRole {
    fn rank(self) -> u8 {
        match self {
            AdminRole::SuperAdmin => 3,
            AdminRole::Admin => 2,
            AdminRole::Viewer => 1,
        }
    }

    /// Super admins can do everything admins can, admins everything viewers can.
    pub fn permits(self, required: AdminRole) -> bool {
        self.rank() >= required.rank()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Admin {
    pub username: String,
    /// argon2 PHC string
    pub password: String,
    /// Missing on files written before roles existed
    #[serde(default, deserialize_with = "lenient_role")]
    pub role: AdminRole,
}

/// Admin as shown to API callers, without the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AdminView {
    #[schema(example = "root")]
    pub username: String,
    pub role: AdminRole,
}

impl From<&Admin> for AdminView {
    fn from(admin: &Admin) -> Self {
        Self {
            username: admin.username.clone(),
            role: admin.role,
        }
    }
}

/// Unknown role names get the least privilege rather than failing the load.
fn lenient_role<'de, D>(deserializer: D) -> Result<AdminRole, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(match raw {
        Some(name) => AdminRole::from_str(name.trim()).unwrap_or(AdminRole::Viewer),
        None => AdminRole::Admin,
    })
}
