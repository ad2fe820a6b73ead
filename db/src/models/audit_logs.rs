use crate::models::enums::*;
use crate::schema::audit_logs;
use crate::utils::errors::*;
use chrono::prelude::*;
use diesel;
use diesel::prelude::*;
use log::Level::Info;
use serde_json;
use uuid::Uuid;

/// Append-only history of state changes. Rows are only ever inserted; there is
/// no update or delete path.
#[derive(Clone, Debug, PartialEq, Identifiable, Queryable, Serialize, Deserialize)]
pub struct AuditLog {
    pub id: Uuid,
    pub event_type: AuditEvents,
    pub display_text: String,
    pub main_table: Tables,
    pub main_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub event_data: Option<serde_json::Value>,
    pub created_at: NaiveDateTime,
}

impl AuditLog {
    pub fn create(
        event_type: AuditEvents,
        display_text: String,
        main_table: Tables,
        main_id: Option<Uuid>,
        user_id: Option<Uuid>,
        event_data: Option<serde_json::Value>,
    ) -> NewAuditLog {
        NewAuditLog {
            event_type,
            display_text,
            main_table,
            main_id,
            user_id,
            event_data,
        }
    }

    pub fn find(
        main_table: Tables,
        main_id: Option<Uuid>,
        event_type: Option<AuditEvents>,
        conn: &mut PgConnection,
    ) -> Result<Vec<AuditLog>, DatabaseError> {
        let mut query = audit_logs::table
            .filter(audit_logs::main_table.eq(main_table))
            .filter(audit_logs::main_id.eq(main_id))
            .into_boxed();

        if let Some(event_type) = event_type {
            query = query.filter(audit_logs::event_type.eq(event_type));
        }

        query
            .order_by(audit_logs::created_at)
            .load(conn)
            .to_db_error(ErrorCode::QueryError, "Could not load audit logs")
    }

    /// Newest-first page of the log, optionally narrowed to one record's
    /// history.
    pub fn search(
        main_table: Option<Tables>,
        main_id: Option<Uuid>,
        page: u32,
        limit: u32,
        conn: &mut PgConnection,
    ) -> Result<(Vec<AuditLog>, i64), DatabaseError> {
        let mut query = audit_logs::table.into_boxed();
        if let Some(main_table) = main_table {
            query = query.filter(audit_logs::main_table.eq(main_table));
        }
        if let Some(main_id) = main_id {
            query = query.filter(audit_logs::main_id.eq(main_id));
        }

        let mut total_query = audit_logs::table.into_boxed();
        if let Some(main_table) = main_table {
            total_query = total_query.filter(audit_logs::main_table.eq(main_table));
        }
        if let Some(main_id) = main_id {
            total_query = total_query.filter(audit_logs::main_id.eq(main_id));
        }
        let total: i64 = total_query
            .count()
            .get_result(conn)
            .to_db_error(ErrorCode::QueryError, "Could not count audit logs")?;

        let results = query
            .order_by(audit_logs::created_at.desc())
            .limit(limit as i64)
            .offset(page as i64 * limit as i64)
            .load(conn)
            .to_db_error(ErrorCode::QueryError, "Could not load audit logs")?;

        Ok((results, total))
    }
}

#[derive(Insertable, Clone)]
#[diesel(table_name = audit_logs)]
pub struct NewAuditLog {
    pub event_type: AuditEvents,
    pub display_text: String,
    pub main_table: Tables,
    pub main_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub event_data: Option<serde_json::Value>,
}

impl NewAuditLog {
    pub fn commit(self, conn: &mut PgConnection) -> Result<AuditLog, DatabaseError> {
        let result: AuditLog = diesel::insert_into(audit_logs::table)
            .values(&self)
            .get_result(conn)
            .to_db_error(ErrorCode::InsertError, "Could not insert audit log")?;

        jlog!(Info, &format!("Audit: {} `{}` on {}:{}", self.event_type,
            self.display_text, self.main_table, self.main_id.map(|i| i.to_string()).unwrap_or_default()),{"audit_log_id": result.id,
            "event_type": self.event_type.clone(), "main_table": self.main_table.clone(), "main_id": self.main_id, "user_id": self.user_id, "event_data": self.event_data });

        Ok(result)
    }
}
