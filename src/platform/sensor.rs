// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Filter cycle schedule sensors.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local, NaiveTime, TimeDelta, TimeZone};

use crate::client::SpaClient;
use crate::entity::{DeviceClass, Entity, EntityCategory, EntityDescription, EntityHandle};
use crate::error::{Error, Result};
use crate::state::FilterCycleId;

use super::{Platform, PlatformEntity};

/// Value of a filter cycle sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SensorValue {
    /// A point in time.
    Timestamp(DateTime<Local>),
    /// A span, in seconds.
    Seconds(f64),
}

impl fmt::Display for SensorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timestamp(at) => f.write_str(&at.to_rfc3339()),
            Self::Seconds(s) => write!(f, "{s}"),
        }
    }
}

/// Places a daily cycle starting at `start` and running for `duration` on
/// the calendar relative to `now`.
///
/// The cycle starting today is used unless it already ended, in which case
/// tomorrow's is used; a cycle that would end more than a day from now is
/// yesterday's, still running.
#[must_use]
pub fn start_datetime<Tz: TimeZone>(
    start: NaiveTime,
    duration: Duration,
    now: &DateTime<Tz>,
) -> Option<DateTime<Tz>> {
    let duration = TimeDelta::from_std(duration).ok()?;
    let one_day = TimeDelta::days(1);
    let today = now
        .timezone()
        .from_local_datetime(&now.date_naive().and_time(start))
        .earliest()?;
    let end = today.clone() + duration;

    if end < *now {
        return Some(today + one_day);
    }
    if end.signed_duration_since(now) > one_day {
        return Some(today - one_day);
    }
    Some(today)
}

fn cycle_start(spa: &SpaClient, cycle: FilterCycleId) -> Result<SensorValue> {
    let start = spa.filter_cycle_start(cycle)?;
    let duration = spa.filter_cycle_duration(cycle)?;
    start_datetime(start, duration, &Local::now())
        .map(SensorValue::Timestamp)
        .ok_or(Error::not_yet_available("filter cycle start"))
}

fn cycle_duration(spa: &SpaClient, cycle: FilterCycleId) -> Result<SensorValue> {
    Ok(SensorValue::Seconds(
        spa.filter_cycle_duration(cycle)?.as_secs_f64(),
    ))
}

/// When filter cycle 1 starts.
pub static FILTER_CYCLE_1_START: EntityDescription<SpaClient, SensorValue> = EntityDescription {
    key: "filter_cycle_1_start",
    name: Some("Filter cycle 1 start"),
    category: Some(EntityCategory::Diagnostic),
    device_class: Some(DeviceClass::Timestamp),
    unit: None,
    icon: None,
    value_fn: |spa| cycle_start(spa, FilterCycleId::One),
};

/// How long filter cycle 1 runs.
pub static FILTER_CYCLE_1_DURATION: EntityDescription<SpaClient, SensorValue> = EntityDescription {
    key: "filter_cycle_1_duration",
    name: Some("Filter cycle 1 duration"),
    category: Some(EntityCategory::Diagnostic),
    device_class: Some(DeviceClass::Duration),
    unit: Some("s"),
    icon: None,
    value_fn: |spa| cycle_duration(spa, FilterCycleId::One),
};

/// When filter cycle 2 starts.
pub static FILTER_CYCLE_2_START: EntityDescription<SpaClient, SensorValue> = EntityDescription {
    key: "filter_cycle_2_start",
    name: Some("Filter cycle 2 start"),
    category: Some(EntityCategory::Diagnostic),
    device_class: Some(DeviceClass::Timestamp),
    unit: None,
    icon: None,
    value_fn: |spa| cycle_start(spa, FilterCycleId::Two),
};

/// How long filter cycle 2 runs.
pub static FILTER_CYCLE_2_DURATION: EntityDescription<SpaClient, SensorValue> = EntityDescription {
    key: "filter_cycle_2_duration",
    name: Some("Filter cycle 2 duration"),
    category: Some(EntityCategory::Diagnostic),
    device_class: Some(DeviceClass::Duration),
    unit: Some("s"),
    icon: None,
    value_fn: |spa| cycle_duration(spa, FilterCycleId::Two),
};

/// Every sensor of a spa.
pub static DESCRIPTIONS: [&EntityDescription<SpaClient, SensorValue>; 4] = [
    &FILTER_CYCLE_1_START,
    &FILTER_CYCLE_1_DURATION,
    &FILTER_CYCLE_2_START,
    &FILTER_CYCLE_2_DURATION,
];

/// A filter cycle sensor.
#[derive(Debug)]
pub struct BalboaSensor {
    entity: Entity<SpaClient, SensorValue>,
}

impl BalboaSensor {
    /// Creates the sensor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotYetAvailable`] before the configuration handshake.
    pub fn new(
        spa: Arc<SpaClient>,
        description: &'static EntityDescription<SpaClient, SensorValue>,
        freshness_window: Duration,
    ) -> Result<Self> {
        Ok(Self {
            entity: Entity::new(spa, description)?.with_freshness_window(freshness_window),
        })
    }

    /// Returns the underlying adapter.
    #[must_use]
    pub fn entity(&self) -> &Entity<SpaClient, SensorValue> {
        &self.entity
    }

    /// Reads the sensor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotYetAvailable`] until the spa reported the cycle.
    pub fn native_value(&self) -> Result<SensorValue> {
        self.entity.current_value()
    }
}

impl PlatformEntity for BalboaSensor {
    fn platform(&self) -> Platform {
        Platform::Sensor
    }

    fn handle(&self) -> &dyn EntityHandle {
        &self.entity
    }

    fn state(&self) -> Result<String> {
        Ok(self.native_value()?.to_string())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::entity::DEFAULT_FRESHNESS_WINDOW;
    use crate::state::{SpaConfiguration, SpaUpdate};

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, h, m, 0).unwrap()
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    const TWO_HOURS: Duration = Duration::from_secs(2 * 3600);

    #[test]
    fn upcoming_cycle_is_today() {
        let start = start_datetime(hm(20, 0), TWO_HOURS, &at(12, 0)).unwrap();
        assert_eq!(start, at(20, 0));
    }

    #[test]
    fn finished_cycle_moves_to_tomorrow() {
        let start = start_datetime(hm(8, 0), TWO_HOURS, &at(12, 0)).unwrap();
        assert_eq!(start, at(8, 0) + TimeDelta::days(1));
    }

    #[test]
    fn running_cycle_from_yesterday() {
        // 23:00 for 4 hours, seen at 01:00: started yesterday.
        let start = start_datetime(hm(23, 0), Duration::from_secs(4 * 3600), &at(1, 0)).unwrap();
        assert_eq!(start, at(23, 0) - TimeDelta::days(1));
    }

    #[test]
    fn duration_sensor_reports_seconds() {
        let (spa, _rx) = SpaClient::channel("spa.local", 4);
        spa.ingest(SpaUpdate::Configuration(SpaConfiguration::new(
            "00:15:27:ab:cd:ef".parse().unwrap(),
            "BP501G1",
            "1.0",
        )));
        let spa = Arc::new(spa);
        let sensor =
            BalboaSensor::new(Arc::clone(&spa), &FILTER_CYCLE_2_DURATION, DEFAULT_FRESHNESS_WINDOW)
                .unwrap();
        assert!(sensor.native_value().unwrap_err().is_not_yet_available());

        spa.ingest(SpaUpdate::FilterSchedule {
            cycle: FilterCycleId::Two,
            start: hm(20, 0),
            duration: TWO_HOURS,
        });
        assert_eq!(sensor.native_value().unwrap(), SensorValue::Seconds(7200.0));
        assert_eq!(sensor.state().unwrap(), "7200");
        assert_eq!(sensor.entity().unit(), Some("s"));
        assert!(matches!(
            BalboaSensor::new(spa, &FILTER_CYCLE_2_START, DEFAULT_FRESHNESS_WINDOW)
                .unwrap()
                .native_value()
                .unwrap(),
            SensorValue::Timestamp(_)
        ));
    }
}
