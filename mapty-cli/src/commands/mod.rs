mod config_cmd;
mod workout;

pub use config_cmd::ConfigCommand;
pub use workout::{
    AddCommand, ClearCommand, DeleteCommand, EditCommand, ListCommand, LocateCommand,
    ShowCommand,
};
