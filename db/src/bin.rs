use chrono::{Duration, Utc};
use clap::ArgMatches;
use clap::{App, AppSettings, Arg, SubCommand};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, HarnessWithOutput, MigrationHarness};
use marquee_db::models::{Event, Roles, User};
use std::env;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

pub fn main() {
    dotenv::dotenv().ok();

    let matches = App::new("Marquee DB CLI")
        .author("Marquee")
        .about("Command Line Interface for creating and maintaining the Marquee database")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("migrate")
                .about("Migrates the database to the latest version")
                .arg(connection_arg()),
        )
        .subcommand(
            SubCommand::with_name("create")
                .about("Creates a new instance of the database and inserts the system administrator user")
                .arg(connection_arg())
                .arg(
                    Arg::with_name("email")
                        .short("e")
                        .takes_value(true)
                        .help("email for system administrator"),
                )
                .arg(
                    Arg::with_name("phone")
                        .short("m")
                        .takes_value(true)
                        .help("phone number for system administrator"),
                )
                .arg(
                    Arg::with_name("password")
                        .short("p")
                        .takes_value(true)
                        .help("password for system administrator"),
                ),
        )
        .subcommand(
            SubCommand::with_name("close-events")
                .about("Closes published events whose start time is more than a day in the past")
                .arg(connection_arg()),
        )
        .subcommand(
            SubCommand::with_name("verify-counts")
                .about("Reports events whose sold ticket counter disagrees with their tickets")
                .arg(connection_arg()),
        )
        .subcommand(
            SubCommand::with_name("repair-counts")
                .about("Resets drifted sold ticket counters to their counted values")
                .arg(connection_arg()),
        )
        .get_matches();

    match matches.subcommand() {
        ("create", Some(matches)) => create_db_and_user(matches),
        ("migrate", Some(matches)) => migrate_db(matches),
        ("close-events", Some(matches)) => close_events(matches),
        ("verify-counts", Some(matches)) => verify_counts(matches),
        ("repair-counts", Some(matches)) => repair_counts(matches),
        _ => unreachable!("The cli parser will prevent reaching here"),
    }
}

fn connection_arg<'a, 'b>() -> Arg<'a, 'b> {
    Arg::with_name("connection")
        .short("c")
        .takes_value(true)
        .help("Connection string to the database, falls back to DATABASE_URL")
}

fn connection_string(matches: &ArgMatches) -> String {
    matches
        .value_of("connection")
        .map(String::from)
        .or_else(|| env::var("DATABASE_URL").ok())
        .expect("Connection string was not provided")
}

fn establish(conn_string: &str) -> PgConnection {
    PgConnection::establish(conn_string).expect("Could not connect to the database")
}

fn create_db(conn_string: &str) -> Result<(), diesel::result::Error> {
    let parts: Vec<&str> = conn_string.split('/').collect();
    let db = parts.last().unwrap();
    let db = str::replace(db, "'", "''");
    let postgres_conn_string = str::replace(conn_string, &db, "postgres");
    let mut connection = establish(&postgres_conn_string);

    diesel::sql_query(format!("CREATE DATABASE \"{}\"", db))
        .execute(&mut connection)
        .map(|_| ())
}

fn migrate_db(matches: &ArgMatches) {
    let conn_string = connection_string(matches);

    match create_db(&conn_string) {
        Ok(_) => println!("Creating database"),
        Err(_) => println!("Database already exists"),
    }
    println!("Migrating database");

    let mut connection = establish(&conn_string);
    HarnessWithOutput::write_to_stdout(&mut connection)
        .run_pending_migrations(MIGRATIONS)
        .expect("Migration failed");
}

fn create_db_and_user(matches: &ArgMatches) {
    let conn_string = connection_string(matches);

    create_db(&conn_string).expect("Can't create database because one with the same name already exists");

    let mut connection = establish(&conn_string);
    HarnessWithOutput::write_to_stdout(&mut connection)
        .run_pending_migrations(MIGRATIONS)
        .expect("Migration failed");

    let email = matches.value_of("email").expect("Email was not provided");
    let phone = matches.value_of("phone").map(String::from);
    let password = matches.value_of("password").expect("Password was not provided");
    println!("Creating user");

    let user = User::create("System", "Administrator", email, phone, password)
        .commit(&mut connection)
        .expect("Failed to create system admin");
    user.add_role(Roles::Admin, &mut connection)
        .expect("Could not assign System Administrator role to the user");
}

fn close_events(matches: &ArgMatches) {
    let conn_string = connection_string(matches);
    let mut connection = establish(&conn_string);

    let cutoff = Utc::now().naive_utc() - Duration::days(1);
    let closed = Event::close_past(cutoff, &mut connection).expect("Failed to close past events");

    println!("Closed {} past event(s)", closed.len());
    for event in &closed {
        println!("  {} '{}' started {}", event.id, event.name, event.event_start);
    }
}

fn verify_counts(matches: &ArgMatches) {
    let conn_string = connection_string(matches);
    let mut connection = establish(&conn_string);

    let drifted = Event::find_sold_count_drift(&mut connection).expect("Failed to check sold ticket counts");
    if drifted.is_empty() {
        println!("All sold ticket counts match");
        return;
    }

    for check in &drifted {
        println!(
            "{} '{}': sold_tickets={} counted={}",
            check.event_id, check.name, check.sold_tickets, check.counted
        );
    }
    std::process::exit(1);
}

fn repair_counts(matches: &ArgMatches) {
    let conn_string = connection_string(matches);
    let mut connection = establish(&conn_string);

    let repaired = connection
        .transaction(|conn| Event::repair_sold_counts(conn))
        .expect("Failed to repair sold ticket counts");

    println!("Repaired {} counter(s)", repaired.len());
    for check in &repaired {
        println!("  {} '{}': {} -> {}", check.event_id, check.name, check.sold_tickets, check.counted);
    }
}
