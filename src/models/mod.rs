//! Data models for Ouvrage

pub mod activity;
pub mod attachment;
pub mod client;
pub mod enums;
pub mod equipment;
pub mod equipment_model;
pub mod hierarchy;
pub mod identity;
pub mod intervention;
pub mod spare_part;

// Re-export commonly used types
pub use activity::{Activity, ActivitySummary};
pub use attachment::Attachment;
pub use client::Client;
pub use enums::{ActivityState, AttachmentOwner, Role, Urgency};
pub use equipment::Equipment;
pub use equipment_model::EquipmentModel;
pub use hierarchy::HierarchyReport;
pub use identity::Identity;
pub use intervention::Intervention;
pub use spare_part::SparePart;
