use crate::models::*;
use crate::schema::users;
use crate::utils::errors::{ConvertToDatabaseError, DatabaseError, ErrorCode, Optional};
use crate::utils::passwords::PasswordHash;
use chrono::NaiveDateTime;
use diesel;
use diesel::dsl;
use diesel::prelude::*;
use uuid::Uuid;
use validator::Validate;

#[derive(Insertable, PartialEq, Debug, Validate)]
#[diesel(table_name = users)]
pub struct NewUser {
    #[validate(length(min = 1, message = "First name must not be empty"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name must not be empty"))]
    pub last_name: String,
    #[validate(email(message = "Email is invalid"))]
    pub email: String,
    pub phone: Option<String>,
    pub hashed_pw: Option<String>,
    role: Vec<String>,
}

#[derive(Queryable, Identifiable, PartialEq, Debug, Clone, QueryableByName)]
#[diesel(table_name = users)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub hashed_pw: Option<String>,
    pub role: Vec<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Debug)]
pub struct DisplayUser {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Vec<String>,
    pub is_guest: bool,
}

impl From<User> for DisplayUser {
    fn from(user: User) -> Self {
        let is_guest = user.is_guest();
        DisplayUser {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            phone: user.phone,
            role: user.role,
            is_guest,
        }
    }
}

impl NewUser {
    pub fn commit(&self, conn: &mut PgConnection) -> Result<User, DatabaseError> {
        self.validate()?;
        let user: User = diesel::insert_into(users::table)
            .values(self)
            .get_result(conn)
            .to_db_error(ErrorCode::InsertError, "Could not create new user")?;

        AuditLog::create(
            AuditEvents::UserCreated,
            format!("User {} created", user.email),
            Tables::Users,
            Some(user.id),
            Some(user.id),
            None,
        )
        .commit(conn)?;

        Ok(user)
    }
}

impl User {
    pub fn create(
        first_name: &str,
        last_name: &str,
        email: &str,
        phone: Option<String>,
        password: &str,
    ) -> NewUser {
        let hash = PasswordHash::generate(password, None);
        NewUser {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.trim().to_lowercase(),
            phone,
            hashed_pw: Some(hash.to_string()),
            role: vec![Roles::User.to_string()],
        }
    }

    /// Guest records are created at guest checkout. They carry no password and
    /// cannot log in until the guest registers with the same email.
    pub fn create_guest(
        first_name: &str,
        last_name: &str,
        email: &str,
        phone: Option<String>,
    ) -> NewUser {
        NewUser {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.trim().to_lowercase(),
            phone,
            hashed_pw: None,
            role: vec![Roles::User.to_string()],
        }
    }

    /// Registers a new account. If a guest record already holds this email the
    /// record is claimed, otherwise an existing full account is a duplicate.
    pub fn register(
        first_name: &str,
        last_name: &str,
        email: &str,
        phone: Option<String>,
        password: &str,
        conn: &mut PgConnection,
    ) -> Result<User, DatabaseError> {
        match User::find_by_email(email, conn).optional()? {
            Some(existing) => {
                if existing.is_guest() {
                    existing.claim_guest(first_name, last_name, phone, password, conn)
                } else {
                    Err(DatabaseError::new(
                        ErrorCode::DuplicateKeyError,
                        Some("A user with this email already exists".to_string()),
                    ))
                }
            }
            None => User::create(first_name, last_name, email, phone, password).commit(conn),
        }
    }

    pub fn find(id: Uuid, conn: &mut PgConnection) -> Result<User, DatabaseError> {
        DatabaseError::wrap(
            ErrorCode::QueryError,
            "Error loading user",
            users::table.find(id).first::<User>(conn),
        )
    }

    pub fn find_by_email(email: &str, conn: &mut PgConnection) -> Result<User, DatabaseError> {
        DatabaseError::wrap(
            ErrorCode::QueryError,
            "Error loading user",
            users::table
                .filter(users::email.eq(email.trim().to_lowercase()))
                .first::<User>(conn),
        )
    }

    fn claim_guest(
        &self,
        first_name: &str,
        last_name: &str,
        phone: Option<String>,
        password: &str,
        conn: &mut PgConnection,
    ) -> Result<User, DatabaseError> {
        let hash = PasswordHash::generate(password, None);
        let user: User = diesel::update(self)
            .set((
                users::first_name.eq(first_name),
                users::last_name.eq(last_name),
                users::phone.eq(phone.or(self.phone.clone())),
                users::hashed_pw.eq(hash.to_string()),
                users::updated_at.eq(dsl::now),
            ))
            .get_result(conn)
            .to_db_error(ErrorCode::UpdateError, "Could not claim guest account")?;

        AuditLog::create(
            AuditEvents::GuestAccountClaimed,
            format!("Guest account {} claimed", user.email),
            Tables::Users,
            Some(user.id),
            Some(user.id),
            None,
        )
        .commit(conn)?;

        Ok(user)
    }

    pub fn check_password(&self, password: &str) -> bool {
        let hashed_pw = match self.hashed_pw.as_ref() {
            Some(h) => h,
            None => return false,
        };
        let hash = match PasswordHash::from_str(hashed_pw) {
            Ok(h) => h,
            Err(_) => return false,
        };
        hash.verify(password)
    }

    pub fn is_guest(&self) -> bool {
        self.hashed_pw.is_none()
    }

    pub fn add_role(&self, r: Roles, conn: &mut PgConnection) -> Result<User, DatabaseError> {
        let mut new_roles = self.role.clone();
        if !new_roles.contains(&r.to_string()) {
            new_roles.push(r.to_string());
        }

        self.update_role(new_roles, conn)
    }

    pub fn has_role(&self, role: Roles) -> bool {
        self.role.contains(&role.to_string())
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Roles::Admin)
    }

    pub fn get_global_scopes(&self) -> Vec<String> {
        let roles = self.role.iter().filter_map(|r| Roles::parse(r).ok()).collect();
        scopes::get_scopes(roles)
            .into_iter()
            .map(|s| s.to_string())
            .collect()
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    fn update_role(&self, new_roles: Vec<String>, conn: &mut PgConnection) -> Result<User, DatabaseError> {
        diesel::update(self)
            .set((users::role.eq(new_roles), users::updated_at.eq(dsl::now)))
            .get_result(conn)
            .to_db_error(ErrorCode::UpdateError, "Could not update user role")
    }

    pub fn for_display(self) -> DisplayUser {
        self.into()
    }
}
