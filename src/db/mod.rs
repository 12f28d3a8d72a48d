pub mod db;
pub mod ticketdb;
pub mod userdb;

pub use db::DBClient;
pub use ticketdb::TicketExt;
pub use userdb::UserExt;
