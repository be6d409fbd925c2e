use cqrs_common::status::{CommandStatus, StatusHolder};
use cqrs_macros::command;
use serde::{Deserialize, Serialize};

#[command(result = bool)]
#[derive(Serialize, Deserialize, Default)]
struct RenameShelf {
    shelf: u32,
    to: String,
}

fn main() {
    let mut cmd = RenameShelf {
        shelf: 3,
        to: "classics".into(),
        ..Default::default()
    };
    cmd.set_status(CommandStatus::Modified).unwrap();

    // status 不参与序列化
    fn assert_serde<T: Serialize + for<'de> Deserialize<'de>>(_: &T) {}
    assert_serde(&cmd);
}
