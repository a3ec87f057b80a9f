//! SignalR Service

use crate::resourceids::typed_resource_id;

pub const API_VERSION: &str = "2023-02-01";

typed_resource_id! {
    /// A SignalR service
    pub struct SignalRId(
        "SignalR",
        "/subscriptions/{subscriptionId}/resourceGroups/{resourceGroupName}/providers/Microsoft.SignalRService/signalR/{signalRName}"
    ) {
        subscription_id => "subscriptionId",
        resource_group_name => "resourceGroupName",
        signal_r_name => "signalRName",
    }
}
