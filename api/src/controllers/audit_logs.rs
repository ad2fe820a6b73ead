use crate::auth::user::User as AuthUser;
use crate::db::Connection;
use crate::errors::*;
use actix_web::web::Query;
use actix_web::HttpResponse;
use marquee_db::models::*;
use uuid::Uuid;

pub async fn index(
    (connection, query, user): (Connection, Query<PagingParameters>, AuthUser),
) -> Result<HttpResponse, ApiError> {
    user.requires_scope(Scopes::AuditRead)?;
    let mut connection = connection.get();
    let connection = &mut *connection;

    let main_table = match query.get_tag("main_table") {
        Some(value) => Some(
            value
                .parse::<Tables>()
                .map_err(|_| ApplicationError::bad_request("Unknown table name"))?,
        ),
        None => None,
    };
    let main_id = match query.get_tag("main_id") {
        Some(value) => Some(Uuid::parse_str(&value)?),
        None => None,
    };

    let (logs, total) = AuditLog::search(main_table, main_id, query.page(), query.limit(), connection)?;
    Ok(HttpResponse::Ok().json(Payload::new(logs, query.into_inner().into(), total)))
}
