use uuid::Uuid;

/// Session context resolved from the `X-User-Id` header.
///
/// Registration hands the client a profile id; every subsequent request
/// carries it back. There is no token layer; identity is a profile row.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub user_id: Uuid,
    pub name: String,
}
