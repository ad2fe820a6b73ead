use diesel::r2d2::{ConnectionManager, PooledConnection};
use diesel::PgConnection;
use std::cell::RefCell;
use std::rc::Rc;

type R2D2PooledConnection = PooledConnection<ConnectionManager<PgConnection>>;

// Workers are single threaded, so a request scoped connection only ever
// moves between futures on one thread. Rc<RefCell<..>> gives diesel the
// `&mut` it needs without poisoning semantics.
pub enum ConnectionType {
    Pg(Rc<RefCell<PgConnection>>),
    R2D2(Rc<RefCell<R2D2PooledConnection>>),
}
