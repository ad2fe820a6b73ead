use std::fmt::Display;
use std::fmt::Error;
use std::fmt::Formatter;

#[derive(Debug, PartialEq, Clone)]
pub enum Roles {
    Admin,
    Staff,
    User,
}

impl Roles {
    pub fn parse(s: &str) -> Result<Roles, &'static str> {
        match s {
            "Admin" => Ok(Roles::Admin),
            "Staff" => Ok(Roles::Staff),
            "User" => Ok(Roles::User),
            _ => Err("Could not parse role. Unexpected value occurred"),
        }
    }
}

impl Display for Roles {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        match self {
            Roles::Admin => write!(f, "Admin"),
            Roles::Staff => write!(f, "Staff"),
            Roles::User => write!(f, "User"),
        }
    }
}

#[test]
fn display() {
    assert_eq!(Roles::Admin.to_string(), "Admin");
    assert_eq!(Roles::Staff.to_string(), "Staff");
    assert_eq!(Roles::User.to_string(), "User");
}

#[test]
fn parse() {
    assert_eq!(Roles::Admin, Roles::parse("Admin").unwrap());
    assert_eq!(Roles::Staff, Roles::parse("Staff").unwrap());
    assert_eq!(Roles::User, Roles::parse("User").unwrap());
    assert!(Roles::parse("Not role").is_err());
}
