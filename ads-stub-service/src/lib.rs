//! # Ads Stub Service
//!
//! **INTERNAL USE ONLY**: This crate exists solely to provide a versioned
//! catalog of generated message/service definitions and gRPC server stubs for
//! integration testing `adwire-core`. It is not intended for production use.

pub mod pb {
    pub mod adsapi {
        pub mod v1 {
            pub mod common {
                include!(concat!(env!("OUT_DIR"), "/adsapi.v1.common.rs"));
            }
            pub mod enums {
                include!(concat!(env!("OUT_DIR"), "/adsapi.v1.enums.rs"));
            }
            pub mod errors {
                include!(concat!(env!("OUT_DIR"), "/adsapi.v1.errors.rs"));
            }
            pub mod resources {
                include!(concat!(env!("OUT_DIR"), "/adsapi.v1.resources.rs"));
            }
            pub mod services {
                include!(concat!(env!("OUT_DIR"), "/adsapi.v1.services.rs"));
            }
        }
        pub mod v2 {
            pub mod common {
                include!(concat!(env!("OUT_DIR"), "/adsapi.v2.common.rs"));
            }
            pub mod enums {
                include!(concat!(env!("OUT_DIR"), "/adsapi.v2.enums.rs"));
            }
            pub mod errors {
                include!(concat!(env!("OUT_DIR"), "/adsapi.v2.errors.rs"));
            }
            pub mod resources {
                include!(concat!(env!("OUT_DIR"), "/adsapi.v2.resources.rs"));
            }
            pub mod services {
                include!(concat!(env!("OUT_DIR"), "/adsapi.v2.services.rs"));
            }
        }
    }
}

pub use pb::adsapi::v1::services::ad_group_service_server::{
    AdGroupService, AdGroupServiceServer,
};
pub use pb::adsapi::v1::services::campaign_service_server::{
    CampaignService, CampaignServiceServer,
};
pub use pb::adsapi::v2::services::campaign_service_server::{
    CampaignService as CampaignServiceV2, CampaignServiceServer as CampaignServiceV2Server,
};

pub const FILE_DESCRIPTOR_SET: &[u8] = tonic::include_file_descriptor_set!("descriptors");
