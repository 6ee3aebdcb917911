use sql_warehouse::prelude::*;

fn orders_session(open_rows: i64) -> Session<SqliteConnection> {
    let config = WarehouseConfig::builder()
        .server_hostname(":memory:")
        .finish();
    let mut session = Session::open(&SqliteDriver::new(), config).unwrap();
    session
        .execute(
            "CREATE TABLE orders (id INTEGER PRIMARY KEY, status TEXT)",
            &Parameters::new(),
            true,
        )
        .unwrap();
    for id in 1..=open_rows {
        session
            .insert("orders")
            .set("id", id)
            .set("status", "open")
            .execute()
            .unwrap();
    }
    session
        .insert("orders")
        .set("id", open_rows + 1)
        .set("status", "closed")
        .execute()
        .unwrap();
    session
}

#[test]
fn first_page_of_five_matches_is_not_last() {
    let mut session = orders_session(5);
    let page = session
        .select("orders")
        .where_eq("status", "open")
        .paging(0, 2)
        .unwrap();
    assert_eq!(page.page_number, 0);
    assert_eq!(page.page_size, 2);
    assert_eq!(page.len(), 2);
    assert!(!page.last);
}

#[test]
fn exact_fit_is_the_last_page() {
    let mut session = orders_session(2);
    let page = session
        .select("orders")
        .where_eq("status", "open")
        .paging(0, 2)
        .unwrap();
    assert_eq!(page.len(), 2);
    assert!(page.last);
}

#[test]
fn trailing_page_returns_remainder() {
    let mut session = orders_session(5);
    let page = session
        .select("orders")
        .where_eq("status", "open")
        .order_by(&["id"])
        .paging(2, 2)
        .unwrap();
    assert_eq!(page.len(), 1);
    assert!(page.last);
    assert_eq!(*page.data[0].get("id").unwrap().as_int().unwrap(), 5);
}

#[test]
fn pages_advance_by_offset() {
    let mut session = orders_session(5);
    let page = session
        .select("orders")
        .where_eq("status", "open")
        .order_by(&["id"])
        .paging(1, 2)
        .unwrap();
    let ids: Vec<i64> = page
        .data
        .iter()
        .map(|row| *row.get("id").unwrap().as_int().unwrap())
        .collect();
    assert_eq!(ids, [3, 4]);
    assert!(!page.last);
}

#[test]
fn empty_result_is_an_empty_last_page() {
    let mut session = orders_session(3);
    let page = session
        .select("orders")
        .where_eq("status", "void")
        .paging(0, 2)
        .unwrap();
    assert!(page.is_empty());
    assert!(page.last);
}

#[test]
fn session_paging_wraps_arbitrary_commands() {
    let mut session = orders_session(5);
    let params = Parameters::new().with("status", "open");
    let page = session
        .paging(
            "SELECT * FROM orders WHERE status = :status ORDER BY id",
            1,
            &params,
            2,
            true,
        )
        .unwrap();
    assert_eq!(page.page_number, 1);
    assert_eq!(page.len(), 2);
    assert!(!page.last);
    assert_eq!(*page.data[0].get("id").unwrap().as_int().unwrap(), 3);
}

#[test]
fn paging_command_requests_lookahead_row() {
    let mut session = orders_session(5);
    let builder = session
        .select("orders")
        .where_eq("status", "open")
        .order_by(&["id"]);
    // The page clause is only attached by paging(); the base command is
    // unchanged until then.
    assert_eq!(
        builder.command(),
        "SELECT * FROM orders WHERE status = :status ORDER BY id"
    );
    let page = builder.paging(0, 4).unwrap();
    // 5 matches, size 4: the size+1 lookahead found a 5th row, so the
    // page keeps exactly `size` rows and is not last.
    assert_eq!(page.len(), 4);
    assert!(!page.last);
}
