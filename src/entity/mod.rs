pub mod personality;

pub use personality::{
    PersonalityConfig, PersonalityId, PersonalityTable, ThresholdPolicy,
};
