use std::cell::RefCell;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::Rc;
use std::sync::Arc;

use sql_warehouse::prelude::*;

type EventLog = Rc<RefCell<Vec<&'static str>>>;

/// Driver double that records the scoped-resource protocol.
struct RecordingDriver {
    events: EventLog,
}

struct RecordingConnection {
    events: EventLog,
}

struct RecordingCursor {
    events: EventLog,
}

impl WarehouseDriver for RecordingDriver {
    type Connection = RecordingConnection;

    fn connect(&self, _config: &WarehouseConfig) -> Result<Self::Connection, WarehouseError> {
        self.events.borrow_mut().push("connect");
        Ok(RecordingConnection {
            events: self.events.clone(),
        })
    }

    fn placeholder_style(&self) -> PlaceholderStyle {
        PlaceholderStyle::Colon
    }
}

impl DriverConnection for RecordingConnection {
    type Cursor = RecordingCursor;

    fn execute(&mut self, _sql: &str, _params: &Parameters) -> Result<Self::Cursor, WarehouseError> {
        self.events.borrow_mut().push("execute");
        Ok(RecordingCursor {
            events: self.events.clone(),
        })
    }

    fn commit(&mut self) -> Result<(), WarehouseError> {
        self.events.borrow_mut().push("commit");
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), WarehouseError> {
        self.events.borrow_mut().push("rollback");
        Ok(())
    }

    fn close(&mut self) -> Result<(), WarehouseError> {
        self.events.borrow_mut().push("close");
        Ok(())
    }
}

impl DriverCursor for RecordingCursor {
    fn columns(&self) -> Arc<Vec<String>> {
        Arc::new(Vec::new())
    }

    fn fetch_one(&mut self) -> Result<Option<Vec<SqlValue>>, WarehouseError> {
        Ok(None)
    }

    fn fetch_many(&mut self, _n: usize) -> Result<Vec<Vec<SqlValue>>, WarehouseError> {
        Ok(Vec::new())
    }

    fn fetch_all(&mut self) -> Result<Vec<Vec<SqlValue>>, WarehouseError> {
        Ok(Vec::new())
    }

    fn rows_affected(&self) -> usize {
        0
    }

    fn close(&mut self) -> Result<(), WarehouseError> {
        self.events.borrow_mut().push("cursor_close");
        Ok(())
    }
}

fn recording_driver() -> (RecordingDriver, EventLog) {
    let events: EventLog = Rc::new(RefCell::new(Vec::new()));
    (
        RecordingDriver {
            events: events.clone(),
        },
        events,
    )
}

fn config() -> WarehouseConfig {
    WarehouseConfig::builder().server_hostname("test").finish()
}

#[test]
fn clean_exit_commits_and_closes_everything() {
    let (driver, events) = recording_driver();
    Session::transact(&driver, config(), |session| {
        session.execute("DELETE FROM t", &Parameters::new(), true)?;
        Ok(())
    })
    .unwrap();
    assert_eq!(
        *events.borrow(),
        ["connect", "execute", "cursor_close", "commit", "close"]
    );
}

#[test]
fn error_exit_rolls_back_and_never_commits() {
    let (driver, events) = recording_driver();
    let result: Result<(), WarehouseError> = Session::transact(&driver, config(), |session| {
        session.execute("DELETE FROM t", &Parameters::new(), true)?;
        Err(WarehouseError::ExecutionError("boom".to_string()))
    });
    assert!(result.is_err());
    assert_eq!(
        *events.borrow(),
        ["connect", "execute", "cursor_close", "rollback", "close"]
    );
}

#[test]
fn dropped_session_rolls_back() {
    let (driver, events) = recording_driver();
    {
        let mut session = Session::open(&driver, config()).unwrap();
        session
            .execute("DELETE FROM t", &Parameters::new(), true)
            .unwrap();
    }
    assert_eq!(
        *events.borrow(),
        ["connect", "execute", "cursor_close", "rollback", "close"]
    );
}

#[test]
fn panic_in_body_reaches_the_rollback_guard() {
    let (driver, events) = recording_driver();
    let outcome = catch_unwind(AssertUnwindSafe(|| {
        let _: Result<(), WarehouseError> = Session::transact(&driver, config(), |session| {
            session.execute("DELETE FROM t", &Parameters::new(), true)?;
            panic!("body blew up");
        });
    }));
    assert!(outcome.is_err());
    let events = events.borrow();
    assert!(events.contains(&"rollback"));
    assert!(events.contains(&"close"));
    assert!(!events.contains(&"commit"));
}

#[test]
fn explicit_commit_and_rollback_consume_the_session() {
    let (driver, events) = recording_driver();
    let session = Session::open(&driver, config()).unwrap();
    session.commit().unwrap();

    let session = Session::open(&driver, config()).unwrap();
    session.rollback().unwrap();

    assert_eq!(
        *events.borrow(),
        ["connect", "commit", "close", "connect", "rollback", "close"]
    );
}

#[test]
fn sqlite_commit_persists_and_rollback_discards() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("scope.db");
    let config = || {
        WarehouseConfig::builder()
            .server_hostname(db_path.to_string_lossy())
            .finish()
    };
    let driver = SqliteDriver::new();

    Session::transact(&driver, config(), |session| {
        session.execute(
            "CREATE TABLE audit (id INTEGER PRIMARY KEY, note TEXT)",
            &Parameters::new(),
            true,
        )?;
        session
            .insert("audit")
            .set("id", 1)
            .set("note", "kept")
            .execute()?;
        Ok(())
    })
    .unwrap();

    // A failing scope must not leave its insert behind.
    let result: Result<(), WarehouseError> = Session::transact(&driver, config(), |session| {
        session
            .insert("audit")
            .set("id", 2)
            .set("note", "discarded")
            .execute()?;
        Err(WarehouseError::ExecutionError("abort".to_string()))
    });
    assert!(result.is_err());

    // Neither must a scope that is dropped without finishing.
    {
        let mut session = Session::open(&driver, config()).unwrap();
        session
            .insert("audit")
            .set("id", 3)
            .set("note", "dropped")
            .execute()
            .unwrap();
    }

    let mut session = Session::open(&driver, config()).unwrap();
    let row = session
        .select("audit")
        .fields(&["COUNT(*) AS cnt"])
        .execute()
        .unwrap()
        .fetch_one()
        .unwrap()
        .unwrap();
    assert_eq!(*row.get("cnt").unwrap().as_int().unwrap(), 1);
}
