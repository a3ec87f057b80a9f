//! IDs shared by every resource provider

use super::typed::typed_resource_id;

typed_resource_id! {
    /// A subscription
    pub struct SubscriptionId("Subscription", "/subscriptions/{subscriptionId}") {
        subscription_id => "subscriptionId",
    }
}

typed_resource_id! {
    /// A resource group
    pub struct ResourceGroupId(
        "Resource Group",
        "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}"
    ) {
        subscription_id => "subscriptionId",
        resource_group_name => "resourceGroupName",
    }
}

impl ResourceGroupId {
    pub fn subscription(&self) -> SubscriptionId {
        SubscriptionId::new(self.subscription_id.clone())
    }
}
