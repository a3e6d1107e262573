//! Live map snapshot for an owner: where every employee is, where they have
//! been today, and which shops were collected from today.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult, QueryFilter, QueryOrder,
    QuerySelect,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::database::{
    models::{collections, location_history, shops, users},
    types::Role,
};

/// `[latitude, longitude]`, the order map polylines expect.
pub type Coordinate = [f64; 2];

#[derive(Debug, Clone, PartialEq, Serialize, FromQueryResult, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePosition {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub is_on_duty: bool,
    pub last_latitude: Option<f64>,
    pub last_longitude: Option<f64>,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub last_location_update: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShopSummary {
    pub id: i32,
    pub name: String,
    pub address: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<&shops::Model> for ShopSummary {
    fn from(shop: &shops::Model) -> Self {
        Self {
            id: shop.id,
            name: shop.name.clone(),
            address: shop.address.clone(),
            latitude: shop.latitude,
            longitude: shop.longitude,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeSummary {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CollectionPoint {
    pub id: i32,
    pub amount: f64,
    #[schema(value_type = String, format = DateTime)]
    pub collected_at: DateTime<Utc>,
    pub shop: ShopSummary,
    pub employee: Option<EmployeeSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LiveDashboard {
    pub employees: Vec<EmployeePosition>,
    /// Employee id to today's chronological trail. Employees without a ping today are absent.
    #[schema(value_type = Object)]
    pub history_paths: BTreeMap<i32, Vec<Coordinate>>,
    pub collection_points: Vec<CollectionPoint>,
    pub shops: Vec<shops::Model>,
}

/// Start of the calendar day containing `now`, as seen in `tz`.
pub fn start_of_local_day(tz: Tz, now: DateTime<Utc>) -> DateTime<Utc> {
    let midnight = now.with_timezone(&tz).date_naive().and_time(NaiveTime::MIN);

    // Zones that jump over midnight on DST day start the day at the first valid hour
    (0..=2)
        .find_map(|hours| {
            tz.from_local_datetime(&(midnight + Duration::hours(hours)))
                .earliest()
        })
        .map(|start| start.with_timezone(&Utc))
        .unwrap_or(now)
}

/// Groups location rows into one path per employee.
///
/// Rows must already be in chronological order; the order is kept within each path.
pub fn group_history_paths(rows: &[location_history::Model]) -> BTreeMap<i32, Vec<Coordinate>> {
    let mut paths: BTreeMap<i32, Vec<Coordinate>> = BTreeMap::new();
    for row in rows {
        paths
            .entry(row.employee_id)
            .or_default()
            .push([row.latitude, row.longitude]);
    }
    paths
}

pub async fn load_live_dashboard(
    db: &DatabaseConnection,
    owner_id: i32,
    since: DateTime<Utc>,
) -> Result<LiveDashboard, DbErr> {
    let employees = users::Entity::find()
        .select_only()
        .columns([
            users::Column::Id,
            users::Column::Name,
            users::Column::Email,
            users::Column::IsOnDuty,
            users::Column::LastLatitude,
            users::Column::LastLongitude,
            users::Column::LastLocationUpdate,
        ])
        .filter(users::Column::OwnerId.eq(owner_id))
        .filter(users::Column::Role.eq(Role::Employee))
        .order_by_asc(users::Column::Name)
        .into_model::<EmployeePosition>()
        .all(db)
        .await?;

    let employee_ids: Vec<i32> = employees.iter().map(|employee| employee.id).collect();

    let history = if employee_ids.is_empty() {
        Vec::new()
    } else {
        location_history::Entity::find()
            .filter(location_history::Column::EmployeeId.is_in(employee_ids))
            .filter(location_history::Column::Timestamp.gte(since))
            .order_by_asc(location_history::Column::Timestamp)
            .order_by_asc(location_history::Column::Id)
            .all(db)
            .await?
    };
    let history_paths = group_history_paths(&history);

    let todays_collections = collections::Entity::find()
        .inner_join(shops::Entity)
        .filter(shops::Column::OwnerId.eq(owner_id))
        .filter(collections::Column::CollectedAt.gte(since))
        .order_by_asc(collections::Column::CollectedAt)
        .all(db)
        .await?;

    let owner_shops = shops::Entity::find()
        .filter(shops::Column::OwnerId.eq(owner_id))
        .order_by_asc(shops::Column::Name)
        .all(db)
        .await?;

    let collectors = load_employee_summaries(db, &todays_collections).await?;
    let shops_by_id: HashMap<i32, &shops::Model> =
        owner_shops.iter().map(|shop| (shop.id, shop)).collect();

    let collection_points = todays_collections
        .iter()
        .filter_map(|collection| {
            let shop = shops_by_id.get(&collection.shop_id)?;
            Some(CollectionPoint {
                id: collection.id,
                amount: collection.amount,
                collected_at: collection.collected_at,
                shop: ShopSummary::from(*shop),
                employee: collectors.get(&collection.employee_id).cloned(),
            })
        })
        .collect();

    Ok(LiveDashboard {
        employees,
        history_paths,
        collection_points,
        shops: owner_shops,
    })
}

async fn load_employee_summaries(
    db: &DatabaseConnection,
    rows: &[collections::Model],
) -> Result<HashMap<i32, EmployeeSummary>, DbErr> {
    let mut ids: Vec<i32> = rows.iter().map(|row| row.employee_id).collect();
    ids.sort_unstable();
    ids.dedup();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let employees = users::Entity::find()
        .filter(users::Column::Id.is_in(ids))
        .all(db)
        .await?;

    Ok(employees
        .into_iter()
        .map(|user| {
            (
                user.id,
                EmployeeSummary {
                    id: user.id,
                    name: user.name,
                },
            )
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ping(id: i32, employee_id: i32, lat: f64, lng: f64, minute: u32) -> location_history::Model {
        location_history::Model {
            id,
            employee_id,
            latitude: lat,
            longitude: lng,
            timestamp: Utc.with_ymd_and_hms(2026, 3, 1, 9, minute, 0).unwrap(),
        }
    }

    #[test]
    fn groups_rows_per_employee_in_arrival_order() {
        let rows = vec![
            ping(1, 10, 1.0, 1.5, 0),
            ping(2, 20, 5.0, 5.5, 1),
            ping(3, 10, 2.0, 2.5, 2),
            ping(4, 10, 3.0, 3.5, 3),
        ];

        let paths = group_history_paths(&rows);

        assert_eq!(paths.len(), 2);
        assert_eq!(paths[&10], vec![[1.0, 1.5], [2.0, 2.5], [3.0, 3.5]]);
        assert_eq!(paths[&20], vec![[5.0, 5.5]]);
    }

    #[test]
    fn no_rows_means_no_paths() {
        assert!(group_history_paths(&[]).is_empty());
    }

    #[test]
    fn local_day_starts_at_local_midnight() {
        // 02:30 UTC on March 1st is already 08:00 in Kolkata (+05:30)
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 2, 30, 0).unwrap();
        let start = start_of_local_day(chrono_tz::Asia::Kolkata, now);
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 2, 28, 18, 30, 0).unwrap());

        // ...but still the previous day in New York (-05:00)
        let start = start_of_local_day(chrono_tz::America::New_York, now);
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 2, 28, 5, 0, 0).unwrap());
    }

    #[test]
    fn local_day_survives_midnight_dst_gap() {
        // Santiago springs forward from 00:00 straight to 01:00 in early September
        let tz = chrono_tz::America::Santiago;
        let now = Utc.with_ymd_and_hms(2026, 9, 6, 15, 0, 0).unwrap();
        let start = start_of_local_day(tz, now);
        assert!(start <= now);
        assert_eq!(
            start.with_timezone(&tz).date_naive(),
            now.with_timezone(&tz).date_naive()
        );
    }
}
