use marquee_db::dev::TestProject;
use marquee_db::models::*;
use marquee_db::utils::errors::{get_error_message, ErrorCode, Optional};
use uuid::Uuid;

#[test]
fn commit() {
    let project = TestProject::new();
    let user = User::create(
        "Priya",
        "Nair",
        "priya@example.com",
        Some("+919812345678".to_string()),
        "examplePassword",
    )
    .commit(&mut project.get_connection())
    .unwrap();

    assert_eq!(user.first_name, "Priya");
    assert_eq!(user.last_name, "Nair");
    assert_eq!(user.email, "priya@example.com");
    assert_eq!(user.phone, Some("+919812345678".to_string()));
    assert!(user.hashed_pw.is_some());
    assert_ne!(user.hashed_pw, Some("examplePassword".to_string()));
    assert!(!user.is_guest());

    let logs = AuditLog::find(
        Tables::Users,
        Some(user.id),
        Some(AuditEvents::UserCreated),
        &mut project.get_connection(),
    )
    .unwrap();
    assert_eq!(logs.len(), 1);
}

#[test]
fn commit_normalizes_email() {
    let project = TestProject::new();
    let user = User::create("Priya", "Nair", "  Priya@Example.COM ", None, "examplePassword")
        .commit(&mut project.get_connection())
        .unwrap();

    assert_eq!(user.email, "priya@example.com");
}

#[test]
fn commit_duplicate_email() {
    let project = TestProject::new();
    let user1 = project.create_user().finish();
    let result = User::create("Priya", "Nair", &user1.email.to_uppercase(), None, "examplePassword")
        .commit(&mut project.get_connection());

    assert!(result.is_err());
    assert_eq!(
        result.err().unwrap().code,
        get_error_message(&ErrorCode::DuplicateKeyError).0
    );
}

#[test]
fn new_user_validate() {
    let project = TestProject::new();
    let result = User::create("", "Nair", "not-an-email", None, "examplePassword")
        .commit(&mut project.get_connection());

    match result.unwrap_err().error_code {
        ErrorCode::ValidationError { errors } => {
            assert!(errors.contains_key("first_name"));
            assert!(errors.contains_key("email"));
            assert_eq!(
                &errors["email"][0].message.clone().unwrap().into_owned(),
                "Email is invalid"
            );
        }
        _ => panic!("Expected validation error"),
    }
}

#[test]
fn create_guest_commit() {
    let project = TestProject::new();
    let user = User::create_guest("Dev", "Patel", "dev@example.com", None)
        .commit(&mut project.get_connection())
        .unwrap();

    assert!(user.is_guest());
    assert_eq!(user.hashed_pw, None);
    assert!(!user.check_password("anything"));
}

#[test]
fn register() {
    let project = TestProject::new();
    let user = User::register(
        "Priya",
        "Nair",
        "priya@example.com",
        None,
        "examplePassword",
        &mut project.get_connection(),
    )
    .unwrap();

    assert!(!user.is_guest());
    assert!(user.check_password("examplePassword"));
}

#[test]
fn register_claims_guest_account() {
    let project = TestProject::new();
    let guest = project.create_user().guest().finish();

    let user = User::register(
        "Kavya",
        "Menon",
        &guest.email,
        Some("+911234567890".to_string()),
        "newPassword",
        &mut project.get_connection(),
    )
    .unwrap();

    assert_eq!(user.id, guest.id);
    assert!(!user.is_guest());
    assert_eq!(user.first_name, "Kavya");
    assert_eq!(user.last_name, "Menon");
    assert!(user.check_password("newPassword"));

    let logs = AuditLog::find(
        Tables::Users,
        Some(user.id),
        Some(AuditEvents::GuestAccountClaimed),
        &mut project.get_connection(),
    )
    .unwrap();
    assert_eq!(logs.len(), 1);
}

#[test]
fn register_duplicate_email() {
    let project = TestProject::new();
    let existing = project.create_user().finish();

    let result = User::register(
        "Someone",
        "Else",
        &existing.email,
        None,
        "examplePassword",
        &mut project.get_connection(),
    );

    assert!(result.is_err());
    assert_eq!(
        result.err().unwrap().code,
        get_error_message(&ErrorCode::DuplicateKeyError).0
    );
}

#[test]
fn find() {
    let project = TestProject::new();
    let user = project.create_user().finish();

    let found = User::find(user.id, &mut project.get_connection()).expect("User was not found");
    assert_eq!(found.id, user.id);
    assert_eq!(found.email, user.email);

    assert!(User::find(Uuid::new_v4(), &mut project.get_connection()).is_err());
}

#[test]
fn find_by_email() {
    let project = TestProject::new();
    let user = project
        .create_user()
        .with_email("mixed.Case@Example.com".to_string())
        .finish();

    let found = User::find_by_email("Mixed.case@example.COM", &mut project.get_connection()).unwrap();
    assert_eq!(found.id, user.id);

    let missing = User::find_by_email("missing@example.com", &mut project.get_connection())
        .optional()
        .unwrap();
    assert!(missing.is_none());
}

#[test]
fn check_password() {
    let project = TestProject::new();
    let user = project.create_user().with_password("correct horse".to_string()).finish();

    assert!(user.check_password("correct horse"));
    assert!(!user.check_password("wrong pony"));
}

#[test]
fn add_role() {
    let project = TestProject::new();
    let user = project.create_user().finish();

    let user = user.add_role(Roles::Staff, &mut project.get_connection()).unwrap();
    assert!(user.has_role(Roles::Staff));
    assert!(!user.is_admin());

    let user = user.add_role(Roles::Staff, &mut project.get_connection()).unwrap();
    assert_eq!(user.role, vec![Roles::Staff.to_string()]);

    let user = user.add_role(Roles::Admin, &mut project.get_connection()).unwrap();
    assert!(user.is_admin());
}

#[test]
fn get_global_scopes() {
    let project = TestProject::new();

    let user = project.create_user().finish();
    assert!(user.get_global_scopes().is_empty());

    let staff = project.create_user().staff().finish();
    assert_equiv!(staff.get_global_scopes(), vec!["event:scan".to_string()]);

    let admin = project.create_user().admin().finish();
    assert_equiv!(
        admin.get_global_scopes(),
        vec![
            "audit:read".to_string(),
            "event:scan".to_string(),
            "event:write".to_string(),
            "plan:write".to_string()
        ]
    );
}

#[test]
fn full_name() {
    let project = TestProject::new();
    let user = project
        .create_user()
        .with_first_name("Bala")
        .with_last_name("Iyer")
        .finish();

    assert_eq!(user.full_name(), "Bala Iyer");
}

#[test]
fn for_display() {
    let project = TestProject::new();
    let guest = project.create_user().guest().finish();

    let display = guest.clone().for_display();
    assert_eq!(display.id, guest.id);
    assert_eq!(display.email, guest.email);
    assert!(display.is_guest);

    let full = project.create_user().finish().for_display();
    assert!(!full.is_guest);
}
