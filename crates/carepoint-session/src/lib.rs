//! carepoint-session
//!
//! Screen-level state: the assessment form, the three list boards and the
//! routes between them. Nothing here renders anything; a frontend drives
//! these types and draws whatever they expose.

pub mod error;
pub mod form;
pub mod lists;
pub mod route;
