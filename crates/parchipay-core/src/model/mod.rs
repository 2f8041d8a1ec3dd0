pub mod committee;
pub mod member;
pub mod user;

pub use committee::{Committee, CommitteeStatus, Draw};
pub use member::{Member, MemberStatus, PaymentRecord, PaymentStatus};
pub use user::{Role, User};
