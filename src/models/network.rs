//! Networking

use crate::payload::arm_enum;
use crate::resourceids::typed_resource_id;

pub const API_VERSION: &str = "2023-09-01";

typed_resource_id! {
    /// A virtual WAN
    pub struct VirtualWanId(
        "Virtual Wan",
        "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Network/virtualWans/{virtualWanName}"
    ) {
        subscription_id => "subscriptionId",
        resource_group_name => "resourceGroupName",
        virtual_wan_name => "virtualWanName",
    }
}

arm_enum! {
    pub enum OfficeTrafficCategory {
        All => "All",
        None => "None",
        Optimize => "Optimize",
        OptimizeAndAllow => "OptimizeAndAllow",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resourceids::TypedResourceId;

    #[test]
    fn test_virtual_wan_id_rejects_other_types() {
        let err = VirtualWanId::parse(
            "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Network/virtualHubs/hub1",
        )
        .unwrap_err();
        assert_eq!(err.segment(), Some("staticVirtualWans"));
    }

    #[test]
    fn test_office_traffic_category() {
        assert_eq!(
            "optimizeandallow".parse::<OfficeTrafficCategory>(),
            Ok(OfficeTrafficCategory::OptimizeAndAllow)
        );
    }
}
