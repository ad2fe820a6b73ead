use chrono::Utc;
use marquee_db::dev::TestProject;
use marquee_db::models::*;
use marquee_db::utils::dates;
use marquee_db::utils::errors::{get_error_message, ErrorCode};
use uuid::Uuid;

#[test]
fn commit() {
    let project = TestProject::new();
    let event = project.create_event().with_price(50000).finish();
    let user = project.create_user().finish();

    let ticket = Ticket::create(event.id, user.id, 2, 100000, None, None)
        .commit(Some(user.id), &mut project.get_connection())
        .unwrap();

    assert_eq!(ticket.event_id, event.id);
    assert_eq!(ticket.user_id, user.id);
    assert_eq!(ticket.quantity, 2);
    assert_eq!(ticket.total_price_in_cents, 100000);
    assert_eq!(ticket.status, TicketStatus::Pending);
    assert_eq!(ticket.redeem_key.len(), 12);
    assert_eq!(ticket.free_access_period, None);

    // a pending ticket holds no capacity yet
    let event = Event::find(event.id, &mut project.get_connection()).unwrap();
    assert_eq!(event.sold_tickets, 0);

    let logs = AuditLog::find(
        Tables::Tickets,
        Some(ticket.id),
        Some(AuditEvents::TicketCreated),
        &mut project.get_connection(),
    )
    .unwrap();
    assert_eq!(logs.len(), 1);
}

#[test]
fn activate() {
    let project = TestProject::new();
    let event = project.create_event().finish();
    let user = project.create_user().finish();
    let ticket = project
        .create_ticket()
        .for_event(&event)
        .for_user(&user)
        .with_quantity(3)
        .finish();

    let ticket = ticket.activate(&mut project.get_connection()).unwrap();
    assert_eq!(ticket.status, TicketStatus::Active);

    let event = Event::find(event.id, &mut project.get_connection()).unwrap();
    assert_eq!(event.sold_tickets, 3);

    // activating an active ticket changes nothing
    let ticket = ticket.activate(&mut project.get_connection()).unwrap();
    assert_eq!(ticket.status, TicketStatus::Active);
    let event = Event::find(event.id, &mut project.get_connection()).unwrap();
    assert_eq!(event.sold_tickets, 3);

    let logs = AuditLog::find(
        Tables::Tickets,
        Some(ticket.id),
        Some(AuditEvents::TicketActivated),
        &mut project.get_connection(),
    )
    .unwrap();
    assert_eq!(logs.len(), 1);
}

#[test]
fn activate_sold_out_event() {
    let project = TestProject::new();
    let event = project.create_event().with_max_tickets(2).finish();
    let user = project.create_user().finish();
    let ticket = project
        .create_ticket()
        .for_event(&event)
        .for_user(&user)
        .with_quantity(3)
        .finish();

    let result = ticket.activate(&mut project.get_connection());
    let error = result.err().unwrap();
    assert_eq!(error.code, get_error_message(&ErrorCode::BusinessProcessError).0);

    // the ticket stays pending and the counter stays put
    let ticket = Ticket::find(ticket.id, &mut project.get_connection()).unwrap();
    assert_eq!(ticket.status, TicketStatus::Pending);
    let event = Event::find(event.id, &mut project.get_connection()).unwrap();
    assert_eq!(event.sold_tickets, 0);
}

#[test]
fn create_free_access() {
    let project = TestProject::new();
    let event = project.create_event().finish();
    let user = project.create_user().finish();
    project.create_subscription().for_user(&user).active().finish();

    let ticket = Ticket::create_free_access(&event, &user, &mut project.get_connection()).unwrap();
    assert_eq!(ticket.status, TicketStatus::Active);
    assert_eq!(ticket.quantity, 1);
    assert_eq!(ticket.total_price_in_cents, 0);
    assert_eq!(
        ticket.free_access_period,
        Some(dates::month_key(Utc::now().naive_utc()))
    );

    let event = Event::find(event.id, &mut project.get_connection()).unwrap();
    assert_eq!(event.sold_tickets, 1);

    let logs = AuditLog::find(
        Tables::Tickets,
        Some(ticket.id),
        Some(AuditEvents::FreeAccessGranted),
        &mut project.get_connection(),
    )
    .unwrap();
    assert_eq!(logs.len(), 1);
}

#[test]
fn create_free_access_once_per_month() {
    let project = TestProject::new();
    let event = project.create_event().finish();
    let other_event = project.create_event().finish();
    let user = project.create_user().finish();
    project.create_subscription().for_user(&user).active().finish();

    Ticket::create_free_access(&event, &user, &mut project.get_connection()).unwrap();

    // the second grant in the same month is refused, on any event
    let result = Ticket::create_free_access(&other_event, &user, &mut project.get_connection());
    let error = result.err().unwrap();
    assert_eq!(error.code, get_error_message(&ErrorCode::BusinessProcessError).0);
    assert!(error.cause.as_ref().unwrap().contains("already been used this month"));

    let other_event = Event::find(other_event.id, &mut project.get_connection()).unwrap();
    assert_eq!(other_event.sold_tickets, 0);
}

#[test]
fn free_access_used_in_month() {
    let project = TestProject::new();
    let event = project.create_event().finish();
    let user = project.create_user().finish();
    let period = dates::month_key(Utc::now().naive_utc());

    assert!(!Ticket::free_access_used_in_month(user.id, &period, &mut project.get_connection()).unwrap());

    let ticket = project
        .create_ticket()
        .for_event(&event)
        .for_user(&user)
        .free_access()
        .finish();
    assert!(Ticket::free_access_used_in_month(user.id, &period, &mut project.get_connection()).unwrap());

    // a cancelled grant no longer counts against the month
    ticket.cancel(Some(user.id), &mut project.get_connection()).unwrap();
    assert!(!Ticket::free_access_used_in_month(user.id, &period, &mut project.get_connection()).unwrap());
}

#[test]
fn redeem_ticket() {
    let project = TestProject::new();
    let staff = project.create_user().staff().finish();
    let ticket = project.create_ticket().active().finish();

    let result = Ticket::redeem_ticket(
        ticket.id,
        ticket.redeem_key.clone(),
        staff.id,
        &mut project.get_connection(),
    )
    .unwrap();

    match result {
        RedeemResults::TicketRedeemSuccess(redeemed) => {
            assert_eq!(redeemed.status, TicketStatus::Redeemed);
            assert_eq!(redeemed.redeemed_by_user_id, Some(staff.id));
            assert!(redeemed.redeemed_at.is_some());
        }
        _ => panic!("Expected the redemption to succeed"),
    }

    let logs = AuditLog::find(
        Tables::Tickets,
        Some(ticket.id),
        Some(AuditEvents::TicketRedeemed),
        &mut project.get_connection(),
    )
    .unwrap();
    assert_eq!(logs.len(), 1);
}

#[test]
fn redeem_ticket_twice() {
    let project = TestProject::new();
    let staff = project.create_user().staff().finish();
    let ticket = project.create_ticket().active().finish();

    Ticket::redeem_ticket(
        ticket.id,
        ticket.redeem_key.clone(),
        staff.id,
        &mut project.get_connection(),
    )
    .unwrap();

    let result = Ticket::redeem_ticket(
        ticket.id,
        ticket.redeem_key.clone(),
        staff.id,
        &mut project.get_connection(),
    )
    .unwrap();
    assert_eq!(result, RedeemResults::TicketAlreadyRedeemed);
}

#[test]
fn redeem_ticket_wrong_key() {
    let project = TestProject::new();
    let staff = project.create_user().staff().finish();
    let ticket = project.create_ticket().active().finish();

    let result = Ticket::redeem_ticket(
        ticket.id,
        "WRONGKEY9999".to_string(),
        staff.id,
        &mut project.get_connection(),
    )
    .unwrap();
    assert_eq!(result, RedeemResults::TicketInvalid);

    let ticket = Ticket::find(ticket.id, &mut project.get_connection()).unwrap();
    assert_eq!(ticket.status, TicketStatus::Active);
}

#[test]
fn redeem_ticket_not_active() {
    let project = TestProject::new();
    let staff = project.create_user().staff().finish();
    let ticket = project.create_ticket().finish();

    let result = Ticket::redeem_ticket(
        ticket.id,
        ticket.redeem_key.clone(),
        staff.id,
        &mut project.get_connection(),
    )
    .unwrap();
    assert_eq!(result, RedeemResults::TicketInvalid);
}

#[test]
fn find_for_user() {
    let project = TestProject::new();
    let user = project.create_user().finish();
    let first = project.create_ticket().for_user(&user).finish();
    let second = project.create_ticket().for_user(&user).finish();
    project.create_ticket().finish();

    let (tickets, total) = Ticket::find_for_user(user.id, 0, 50, &mut project.get_connection()).unwrap();
    assert_eq!(total, 2);
    let ids: Vec<Uuid> = tickets.iter().map(|t| t.id).collect();
    assert_equiv!(ids, vec![first.id, second.id]);

    let (page, total) = Ticket::find_for_user(user.id, 1, 1, &mut project.get_connection()).unwrap();
    assert_eq!(total, 2);
    assert_eq!(page.len(), 1);
}

#[test]
fn door_list() {
    let project = TestProject::new();
    let event = project.create_event().finish();
    let purchaser = project
        .create_user()
        .with_first_name("Meera")
        .with_last_name("Pillai")
        .finish();
    let pending = project.create_ticket().for_event(&event).finish();
    let active = project
        .create_ticket()
        .for_event(&event)
        .for_user(&purchaser)
        .active()
        .finish();

    let (list, total) = Ticket::door_list(event.id, 0, 50, &mut project.get_connection()).unwrap();
    assert_eq!(total, 2);
    assert_eq!(list.len(), 2);

    // valid tickets lead the list
    assert_eq!(list[0].ticket_id, active.id);
    assert_eq!(list[0].purchaser_name, "Meera Pillai");
    assert_eq!(list[0].purchaser_email, purchaser.email);
    assert_eq!(list[1].ticket_id, pending.id);
    assert_eq!(list[1].status, TicketStatus::Pending);
}

#[test]
fn door_list_shows_guest_contact() {
    let project = TestProject::new();
    let event = project.create_event().finish();
    let guest_account = project.create_user().guest().finish();
    project
        .create_ticket()
        .for_event(&event)
        .for_user(&guest_account)
        .as_guest("Rohan Desai", "rohan@example.com")
        .active()
        .finish();

    let (list, _) = Ticket::door_list(event.id, 0, 50, &mut project.get_connection()).unwrap();
    assert_eq!(list[0].purchaser_name, "Rohan Desai");
    assert_eq!(list[0].purchaser_email, "rohan@example.com");
}

#[test]
fn cancel() {
    let project = TestProject::new();
    let event = project.create_event().finish();
    let ticket = project.create_ticket().for_event(&event).active().finish();

    let event_before = Event::find(event.id, &mut project.get_connection()).unwrap();
    assert_eq!(event_before.sold_tickets, 1);

    let cancelled = ticket.cancel(None, &mut project.get_connection()).unwrap();
    assert_eq!(cancelled.status, TicketStatus::Cancelled);

    // cancelling an active ticket releases its capacity
    let event_after = Event::find(event.id, &mut project.get_connection()).unwrap();
    assert_eq!(event_after.sold_tickets, 0);

    let result = cancelled.cancel(None, &mut project.get_connection());
    assert_eq!(
        result.err().unwrap().code,
        get_error_message(&ErrorCode::BusinessProcessError).0
    );
}

#[test]
fn cancel_pending_ticket_leaves_counter() {
    let project = TestProject::new();
    let event = project.create_event().finish();
    let ticket = project.create_ticket().for_event(&event).finish();

    let cancelled = ticket.cancel(None, &mut project.get_connection()).unwrap();
    assert_eq!(cancelled.status, TicketStatus::Cancelled);

    let event = Event::find(event.id, &mut project.get_connection()).unwrap();
    assert_eq!(event.sold_tickets, 0);
}
