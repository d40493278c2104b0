pub mod block;
pub mod check;
pub mod day;
pub mod edit;
pub mod init;
pub mod nav;
pub mod open;
pub mod record;
pub mod save;
pub mod serve;
pub mod session;
pub mod show;
