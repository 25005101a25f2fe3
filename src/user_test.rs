use super::*;

// =============================================================================
// Helpers
// =============================================================================

fn make_record() -> UserRecord {
    UserRecord {
        id: "u-1".into(),
        name: "Budi".into(),
        username: "budi".into(),
        role: Role::Staff,
        password: "rahasia".into(),
        created_at: "2024-05-01T08:00:00Z".into(),
    }
}

// =============================================================================
// Role
// =============================================================================

#[test]
fn role_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
    assert_eq!(serde_json::to_string(&Role::Staff).unwrap(), "\"staff\"");
}

#[test]
fn role_rejects_unknown_value() {
    assert!(serde_json::from_str::<Role>("\"owner\"").is_err());
}

#[test]
fn role_from_str_matches_wire_names() {
    assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
    assert_eq!("staff".parse::<Role>().unwrap(), Role::Staff);
    let err = "Admin".parse::<Role>().unwrap_err();
    assert!(err.contains("unknown role"));
}

#[test]
fn role_display_uses_wire_name() {
    assert_eq!(Role::Admin.to_string(), "admin");
}

// =============================================================================
// UserRecord -> User
// =============================================================================

#[test]
fn user_from_record_copies_public_fields() {
    let user = User::from(make_record());
    assert_eq!(user.id, "u-1");
    assert_eq!(user.name, "Budi");
    assert_eq!(user.username, "budi");
    assert_eq!(user.role, Role::Staff);
    assert_eq!(user.created_at, "2024-05-01T08:00:00Z");
    assert!(!user.is_admin());
}

#[test]
fn user_json_has_no_password() {
    let user = User::from(make_record());
    let json: serde_json::Value = serde_json::to_value(&user).unwrap();
    assert!(json.get("password").is_none());
    assert_eq!(json["role"], "staff");
}

#[test]
fn record_accepts_numeric_id() {
    let raw = r#"{"id": 42, "name": "Sari", "username": "sari", "role": "admin",
                  "password": "x", "created_at": "2024-01-01T00:00:00Z"}"#;
    let record: UserRecord = serde_json::from_str(raw).unwrap();
    assert_eq!(record.id, "42");
    assert_eq!(record.role, Role::Admin);
}

#[test]
fn record_rejects_object_id() {
    let raw = r#"{"id": {"n": 1}, "name": "Sari", "username": "sari", "role": "admin",
                  "password": "x", "created_at": "2024-01-01T00:00:00Z"}"#;
    assert!(serde_json::from_str::<UserRecord>(raw).is_err());
}

// =============================================================================
// from_snapshot
// =============================================================================

#[test]
fn snapshot_parses_valid_user() {
    let user = User::from(make_record());
    let raw = serde_json::to_string(&user).unwrap();
    assert_eq!(User::from_snapshot(&raw).unwrap(), user);
}

#[test]
fn snapshot_rejects_non_json() {
    assert!(User::from_snapshot("{not json").is_err());
}

#[test]
fn snapshot_rejects_empty_username() {
    let raw = r#"{"id": "1", "name": "A", "username": "", "role": "staff", "created_at": "t"}"#;
    let err = User::from_snapshot(raw).unwrap_err();
    assert!(err.to_string().contains("empty username"));
}

#[test]
fn snapshot_rejects_unknown_role() {
    let raw = r#"{"id": "1", "name": "A", "username": "a", "role": "owner", "created_at": "t"}"#;
    assert!(User::from_snapshot(raw).is_err());
}

#[test]
fn snapshot_rejects_missing_field() {
    let raw = r#"{"id": "1", "name": "A", "username": "a", "role": "staff"}"#;
    assert!(User::from_snapshot(raw).is_err());
}
