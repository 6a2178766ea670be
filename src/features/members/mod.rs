/// Member feature
///
/// Registration, editing and deletion of dahira members, plus each member's
/// monthly due and payment tracker.
pub mod commands;
pub mod models;
pub mod repository;

pub use commands::{
    create_member, delete_member, get_member, get_member_monthly_due, get_member_payment_tracker,
    get_members, update_member,
};

pub use models::{CreateMemberDto, DuesStatus, Gender, Member, MemberFilter, UpdateMemberDto};
