//! Request factory.
//!
//! One function per service endpoint. Functions are grouped by the resource
//! they address; all of them are re-exported here so callers write
//! `factory::get_profile(..)` without caring about the grouping.

mod accounts;
mod attachments;
mod devices;
mod directory;
mod keys;
mod messages;
mod profile;

pub use accounts::{
    disable_two_factor, enable_two_factor, register_for_push, request_verification_code,
    turn_server_info, unregister_account, update_attributes,
};
pub use attachments::{allocate_attachment, attachment};
pub use devices::{delete_device, device_provisioning, device_provisioning_code, get_devices};
pub use directory::contacts_intersection;
pub use keys::{
    available_prekeys_count, current_signed_prekey, recipient_prekey, register_prekeys,
    register_signed_prekey,
};
pub use messages::{acknowledge_message_delivery, get_messages, submit_message};
pub use profile::{get_profile, profile_avatar_upload_form};
