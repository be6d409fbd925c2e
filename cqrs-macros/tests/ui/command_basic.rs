use cqrs_common::request::{Command, Request};
use cqrs_common::status::{CommandStatus, StatusHolder, StatusTracker};
use cqrs_macros::command;

#[command(result = u64, name = "books.create")]
#[derive(Default)]
struct CreateBook {
    title: String,
}

#[command]
struct Touch {
    id: u32,
    status: StatusTracker,
}

#[command(debug = false)]
struct Quiet {}

fn assert_command<C: Command>() {}

fn main() {
    assert_command::<CreateBook>();
    assert_command::<Touch>();
    assert_command::<Quiet>();

    assert_eq!(CreateBook::NAME, "books.create");
    assert_eq!(Touch::NAME, "Touch");

    let mut cmd = CreateBook {
        title: "Dune".into(),
        ..Default::default()
    };
    assert_eq!(cmd.status(), CommandStatus::Default);
    cmd.set_status(CommandStatus::Created).unwrap();
    assert_eq!(cmd.status(), CommandStatus::Created);
    let _ = format!("{cmd:?}");

    let touch = Touch {
        id: 1,
        status: StatusTracker::new(),
    };
    let _: <Touch as Request>::Response = ();
    let _ = touch.id;

    let _ = Quiet {
        status: StatusTracker::default(),
    };
}
