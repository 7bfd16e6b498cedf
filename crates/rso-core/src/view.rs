//! 已确认患者视图
//!
//! 筛选 Confirmed 状态的患者并按预约日期或姓名排序，附带剂量推荐。

use crate::models::{AppointmentStatus, Patient};
use crate::reference::{DoseRecommendation, ReferenceTables, VendorShare};
use icu_collator::{Collator, CollatorOptions};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::warn;

/// 排序方式
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Date,
    Name,
}

impl SortKey {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "date" => Some(SortKey::Date),
            "name" => Some(SortKey::Name),
            _ => None,
        }
    }
}

/// 姓名排序规则：Unicode 根区域排序，先比较字母与重音，最后才区分大小写
struct NameCollation {
    collator: Option<Collator>,
}

impl NameCollation {
    fn new() -> Self {
        let collator = match Collator::try_new(&Default::default(), CollatorOptions::new()) {
            Ok(collator) => Some(collator),
            Err(e) => {
                warn!("Unicode collator unavailable, falling back to case-insensitive order: {}", e);
                None
            }
        };
        Self { collator }
    }

    fn compare(&self, a: &str, b: &str) -> Ordering {
        match &self.collator {
            Some(collator) => collator.compare(a, b),
            None => a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b)),
        }
    }
}

/// 返回已确认患者，稳定排序：键相同时保持原有顺序。无预约日期的排在最后。
pub fn sort_confirmed(patients: &[Patient], key: SortKey) -> Vec<Patient> {
    let mut confirmed: Vec<Patient> = patients
        .iter()
        .filter(|p| p.appointment_status == AppointmentStatus::Confirmed)
        .cloned()
        .collect();

    match key {
        SortKey::Date => confirmed.sort_by(|a, b| match (a.appointment_date, b.appointment_date) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }),
        SortKey::Name => {
            let names = NameCollation::new();
            confirmed.sort_by(|a, b| names.compare(&a.patient_name, &b.patient_name))
        }
    }

    confirmed
}

/// 按固定比例估算的供应商订单数，仅用于展示
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorOrderEstimate {
    pub vendor: String,
    pub estimated_orders: usize,
}

pub fn estimate_vendor_orders(confirmed_count: usize, shares: &[VendorShare]) -> Vec<VendorOrderEstimate> {
    shares
        .iter()
        .map(|s| VendorOrderEstimate {
            vendor: s.vendor.clone(),
            estimated_orders: (confirmed_count as f64 * s.share).floor() as usize,
        })
        .collect()
}

/// 每日剂量订单中的一行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoseOrderLine {
    pub patient: Patient,
    pub recommendation: DoseRecommendation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfirmedPatientView {
    pub sort: SortKey,
    pub total_confirmed: usize,
    pub vendor_estimates: Vec<VendorOrderEstimate>,
    pub orders: Vec<DoseOrderLine>,
}

impl ConfirmedPatientView {
    pub fn build(patients: &[Patient], sort: SortKey, tables: &ReferenceTables) -> Self {
        let confirmed = sort_confirmed(patients, sort);
        let total_confirmed = confirmed.len();
        let orders = confirmed
            .into_iter()
            .map(|patient| {
                let recommendation = tables.lookup(&patient.scan_type);
                DoseOrderLine { patient, recommendation }
            })
            .collect();

        Self {
            sort,
            total_confirmed,
            vendor_estimates: estimate_vendor_orders(total_confirmed, &tables.vendor_shares),
            orders,
        }
    }
}
