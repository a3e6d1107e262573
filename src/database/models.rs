use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// --- Users (admins, owners and employees share one table) ---
pub mod users {
    use super::*;
    use crate::database::types::{Role, SubscriptionStatus};

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "users")]
    #[serde(rename_all = "camelCase")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub name: String,
        #[sea_orm(unique)]
        pub email: String,
        #[serde(skip_serializing)]
        pub password_hash: String,
        pub role: Role,
        pub owner_id: Option<i32>,
        pub is_on_duty: bool,
        #[sea_orm(column_type = "Double", nullable)]
        pub last_latitude: Option<f64>,
        #[sea_orm(column_type = "Double", nullable)]
        pub last_longitude: Option<f64>,
        pub last_location_update: Option<DateTimeUtc>,
        pub subscription_status: Option<SubscriptionStatus>,
        pub created_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "Entity",
            from = "Column::OwnerId",
            to = "Column::Id"
        )]
        Owner,
        #[sea_orm(has_many = "super::shops::Entity")]
        Shops,
        #[sea_orm(has_many = "super::collections::Entity")]
        Collections,
        #[sea_orm(has_many = "super::location_history::Entity")]
        LocationHistory,
        #[sea_orm(has_many = "super::system_logs::Entity")]
        SystemLogs,
    }

    impl Related<super::shops::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Shops.def()
        }
    }

    impl Related<super::collections::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Collections.def()
        }
    }

    impl Related<super::location_history::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::LocationHistory.def()
        }
    }

    impl Related<super::system_logs::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::SystemLogs.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

// --- Shops ---
pub mod shops {
    use super::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
    #[sea_orm(table_name = "shops")]
    #[serde(rename_all = "camelCase")]
    #[schema(as = Shop)]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub owner_id: i32,
        pub name: String,
        pub address: Option<String>,
        #[sea_orm(column_type = "Double")]
        pub latitude: f64,
        #[sea_orm(column_type = "Double")]
        pub longitude: f64,
        #[schema(value_type = String, format = DateTime)]
        pub created_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::users::Entity",
            from = "Column::OwnerId",
            to = "super::users::Column::Id"
        )]
        Owner,
        #[sea_orm(has_many = "super::collections::Entity")]
        Collections,
    }

    impl Related<super::users::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Owner.def()
        }
    }

    impl Related<super::collections::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Collections.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

// --- Collections ---
pub mod collections {
    use super::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "collections")]
    #[serde(rename_all = "camelCase")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub shop_id: i32,
        pub employee_id: i32,
        #[sea_orm(column_type = "Double")]
        pub amount: f64,
        pub collected_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::shops::Entity",
            from = "Column::ShopId",
            to = "super::shops::Column::Id"
        )]
        Shop,
        #[sea_orm(
            belongs_to = "super::users::Entity",
            from = "Column::EmployeeId",
            to = "super::users::Column::Id"
        )]
        Employee,
    }

    impl Related<super::shops::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Shop.def()
        }
    }

    impl Related<super::users::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Employee.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

// --- LocationHistory (append-only GPS trail) ---
pub mod location_history {
    use super::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "location_history")]
    #[serde(rename_all = "camelCase")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        #[sea_orm(indexed)]
        pub employee_id: i32,
        #[sea_orm(column_type = "Double")]
        pub latitude: f64,
        #[sea_orm(column_type = "Double")]
        pub longitude: f64,
        #[sea_orm(indexed)]
        pub timestamp: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::users::Entity",
            from = "Column::EmployeeId",
            to = "super::users::Column::Id"
        )]
        Employee,
    }

    impl Related<super::users::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Employee.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

// --- Broadcasts ---
pub mod broadcasts {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
    #[sea_orm(table_name = "broadcasts")]
    #[serde(rename_all = "camelCase")]
    #[schema(as = Broadcast)]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub title: String,
        #[sea_orm(column_type = "Text")]
        pub message: String,
        pub is_active: bool,
        #[schema(value_type = String, format = DateTime)]
        pub created_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

// --- SystemLogs (audit trail) ---
pub mod system_logs {
    use super::*;
    use crate::database::types::LogLevel;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "system_logs")]
    #[serde(rename_all = "camelCase")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub level: LogLevel,
        #[sea_orm(column_type = "Text")]
        pub message: String,
        pub user_id: Option<i32>,
        pub created_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::users::Entity",
            from = "Column::UserId",
            to = "super::users::Column::Id"
        )]
        User,
    }

    impl Related<super::users::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::User.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}
