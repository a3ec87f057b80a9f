//! Application Insights and Azure Monitor

use crate::payload::arm_enum;
use crate::resourceids::typed_resource_id;

pub const WEB_TEST_API_VERSION: &str = "2022-06-15";
pub const ACTION_GROUP_API_VERSION: &str = "2021-09-01";

typed_resource_id! {
    /// An Application Insights availability test
    pub struct WebTestId(
        "Web Test",
        "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Insights/webTests/{webTestName}"
    ) {
        subscription_id => "subscriptionId",
        resource_group_name => "resourceGroupName",
        web_test_name => "webTestName",
    }
}

typed_resource_id! {
    /// An Azure Monitor action group
    pub struct ActionGroupId(
        "Action Group",
        "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.Insights/actionGroups/{actionGroupName}"
    ) {
        subscription_id => "subscriptionId",
        resource_group_name => "resourceGroupName",
        action_group_name => "actionGroupName",
    }
}

arm_enum! {
    pub enum WebTestKind {
        Ping => "ping",
        MultiStep => "multistep",
        Standard => "standard",
    }
}
