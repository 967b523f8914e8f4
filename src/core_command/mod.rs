// Request handling: parse the command, then serve a file or a listing
pub mod command;
pub mod dispatcher;
pub mod list;
pub mod retr;

// Wire framing and the directory snapshot
pub mod framer;
pub mod lister;
