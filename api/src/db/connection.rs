use crate::db::*;
use crate::errors::ApiError;
use crate::server::GetAppState;
use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use diesel::connection::{AnsiTransactionManager, TransactionManager};
use diesel::PgConnection;
use futures::future::{ready, Ready};
use std::cell::{RefCell, RefMut};
use std::rc::Rc;

#[derive(Clone)]
pub struct Connection {
    inner: Rc<ConnectionType>,
}

impl From<ConnectionType> for Connection {
    fn from(connection_type: ConnectionType) -> Self {
        Connection {
            inner: Rc::new(connection_type),
        }
    }
}

impl From<Rc<RefCell<PgConnection>>> for Connection {
    fn from(connection: Rc<RefCell<PgConnection>>) -> Self {
        ConnectionType::Pg(connection).into()
    }
}

impl Connection {
    pub fn get(&self) -> RefMut<'_, PgConnection> {
        match *self.inner {
            ConnectionType::Pg(ref connection) => connection.borrow_mut(),
            ConnectionType::R2D2(ref connection) => {
                RefMut::map(connection.borrow_mut(), |pooled| &mut **pooled)
            }
        }
    }

    pub fn begin_transaction(&self) -> Result<(), ApiError> {
        let mut connection = self.get();
        AnsiTransactionManager::begin_transaction(&mut *connection)?;
        Ok(())
    }

    pub fn commit_transaction(&self) -> Result<(), ApiError> {
        let mut connection = self.get();
        AnsiTransactionManager::commit_transaction(&mut *connection)?;
        Ok(())
    }

    pub fn rollback_transaction(&self) -> Result<(), ApiError> {
        let mut connection = self.get();
        AnsiTransactionManager::rollback_transaction(&mut *connection)?;
        Ok(())
    }

    pub fn from_http_request(request: &HttpRequest) -> Result<Connection, ApiError> {
        if let Some(connection) = request.extensions().get::<Connection>() {
            return Ok(connection.clone());
        }

        let connection = request.state().database.get_connection()?;
        connection.begin_transaction()?;
        request.extensions_mut().insert(connection.clone());
        Ok(connection)
    }
}

impl FromRequest for Connection {
    type Error = ApiError;
    type Future = Ready<Result<Connection, ApiError>>;

    fn from_request(request: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Connection::from_http_request(request))
    }
}
