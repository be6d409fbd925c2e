use cqrs_common::request::{Query, Request};
use cqrs_macros::query;

#[query(result = Vec<String>)]
struct ListTitles {
    prefix: String,
}

#[query(result = Option<u32>, name = "books.count")]
struct CountBooks;

#[query(result = bool)]
struct HasBook(u32);

fn assert_query<Q: Query>() {}

fn main() {
    assert_query::<ListTitles>();
    assert_query::<CountBooks>();
    assert_query::<HasBook>();

    assert_eq!(ListTitles::NAME, "ListTitles");
    assert_eq!(CountBooks::NAME, "books.count");

    let q = ListTitles { prefix: "D".into() };
    let _ = format!("{q:?} {:?}", HasBook(1));
    let _: <CountBooks as Request>::Response = Some(0);
}
