use crate::models::Roles;
use crate::utils::errors::EnumParseError;
use serde::Serialize;
use serde::Serializer;
use std::fmt;
use std::str::FromStr;

#[derive(PartialEq, Debug, Copy, Clone, Eq, Ord, PartialOrd)]
pub enum Scopes {
    AuditRead,
    EventScan,
    EventWrite,
    PlanWrite,
}

impl Serialize for Scopes {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl fmt::Display for Scopes {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Scopes::AuditRead => "audit:read",
            Scopes::EventScan => "event:scan",
            Scopes::EventWrite => "event:write",
            Scopes::PlanWrite => "plan:write",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Scopes {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, <Self as FromStr>::Err> {
        let s = match s {
            "audit:read" => Scopes::AuditRead,
            "event:scan" => Scopes::EventScan,
            "event:write" => Scopes::EventWrite,
            "plan:write" => Scopes::PlanWrite,
            _ => {
                return Err(EnumParseError {
                    message: "Could not parse value".to_string(),
                    enum_type: "Scopes".to_string(),
                    value: s.to_string(),
                })
            }
        };
        Ok(s)
    }
}

pub fn get_scopes(roles: Vec<Roles>) -> Vec<Scopes> {
    let mut scopes: Vec<Scopes> = roles.into_iter().flat_map(get_scopes_for_role).collect();
    scopes.sort();
    scopes.dedup();
    scopes
}

fn get_scopes_for_role(role: Roles) -> Vec<Scopes> {
    use crate::models::Roles::*;
    let mut scopes = match role {
        User => vec![],
        Staff => vec![Scopes::EventScan],
        Admin => {
            let mut scopes = vec![Scopes::AuditRead, Scopes::EventWrite, Scopes::PlanWrite];
            scopes.extend(get_scopes_for_role(Roles::Staff));
            scopes
        }
    };
    scopes.sort();
    scopes.dedup();

    scopes
}

#[test]
fn get_scopes_for_role_test() {
    assert!(get_scopes_for_role(Roles::User).is_empty());
    assert_eq!(vec![Scopes::EventScan], get_scopes_for_role(Roles::Staff));
    assert_eq!(
        vec![
            Scopes::AuditRead,
            Scopes::EventScan,
            Scopes::EventWrite,
            Scopes::PlanWrite,
        ],
        get_scopes_for_role(Roles::Admin)
    );
}

#[test]
fn scopes_to_string() {
    assert_eq!("event:scan".to_string(), Scopes::EventScan.to_string());
    assert_eq!("audit:read".to_string(), Scopes::AuditRead.to_string());
}

#[test]
fn get_scopes_test() {
    let res = get_scopes(vec![Roles::User])
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<String>>();
    assert!(res.is_empty());

    let res = get_scopes(vec![Roles::Staff])
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<String>>();
    assert_eq!(vec!["event:scan"], res);

    let mut res = get_scopes(vec![Roles::Admin])
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<String>>();
    res.sort();
    assert_eq!(vec!["audit:read", "event:scan", "event:write", "plan:write"], res);

    let res = get_scopes(vec![Roles::Staff, Roles::Admin])
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<String>>();
    assert_eq!(vec!["audit:read", "event:scan", "event:write", "plan:write"], res);
}

#[test]
fn from_str() {
    let s: Scopes = "event:scan".parse().unwrap();
    assert_eq!(Scopes::EventScan, s);
    assert!("not:scope".parse::<Scopes>().is_err());
}
