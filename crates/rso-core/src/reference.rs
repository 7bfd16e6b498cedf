//! 静态参考表
//!
//! 检查类型 → 推荐剂量/供应商、供应商合同条款、保险报销统计。启动时加载一次，
//! 之后只读。内置默认值可由 TOML 文件整体替换。

use crate::error::{Result, RsoError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

/// 无匹配时使用的占位值
pub const NOT_AVAILABLE: &str = "N/A";
/// 无匹配时的备选理由
pub const NO_SECONDARY_REASON: &str = "No secondary option available";

/// 首选剂量
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoseOption {
    pub dose: String,
    pub vendor: String,
}

/// 备选剂量
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecondaryDoseOption {
    pub dose: String,
    pub vendor: String,
    pub reason: String,
}

/// 单个检查类型的剂量推荐
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoseRecommendation {
    pub primary: DoseOption,
    pub secondary: SecondaryDoseOption,
}

impl DoseRecommendation {
    /// 未知检查类型的回退值
    pub fn not_available() -> Self {
        Self {
            primary: DoseOption {
                dose: NOT_AVAILABLE.to_string(),
                vendor: NOT_AVAILABLE.to_string(),
            },
            secondary: SecondaryDoseOption {
                dose: NOT_AVAILABLE.to_string(),
                vendor: NOT_AVAILABLE.to_string(),
                reason: NO_SECONDARY_REASON.to_string(),
            },
        }
    }

    pub fn is_available(&self) -> bool {
        self.primary.dose != NOT_AVAILABLE
    }
}

/// 参考表中的一行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanTypeDose {
    pub scan_type: String,
    pub primary: DoseOption,
    pub secondary: SecondaryDoseOption,
}

/// 供应商合同
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorContract {
    pub name: String,
    pub contract_term_months: u32,
    pub order_window_hours: u32,
    pub unit_price_usd: f64, // 每剂
}

/// 保险报销统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsuranceReimbursement {
    pub name: String,
    pub reimbursement_rate_percent: u32,
    pub avg_processing_days: u32,
}

/// 订单数估算比例（展示用近似值，不对应真实分配）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorShare {
    pub vendor: String,
    pub share: f64,
}

/// 全部参考表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceTables {
    pub dose_recommendations: Vec<ScanTypeDose>,
    pub vendors: Vec<VendorContract>,
    pub insurance: Vec<InsuranceReimbursement>,
    pub vendor_shares: Vec<VendorShare>,
}

fn dose_row(
    scan_type: &str,
    primary: (&str, &str),
    secondary: (&str, &str, &str),
) -> ScanTypeDose {
    ScanTypeDose {
        scan_type: scan_type.to_string(),
        primary: DoseOption {
            dose: primary.0.to_string(),
            vendor: primary.1.to_string(),
        },
        secondary: SecondaryDoseOption {
            dose: secondary.0.to_string(),
            vendor: secondary.1.to_string(),
            reason: secondary.2.to_string(),
        },
    }
}

impl ReferenceTables {
    /// 内置参考表
    pub fn builtin() -> Self {
        let dose_recommendations = vec![
            dose_row(
                "PET/CT",
                ("10-15 mCi F-18 FDG", "Cardinal Health"),
                ("12 mCi F-18 FDG", "Triad Isotopes", "Backup vendor with faster delivery time"),
            ),
            dose_row(
                "Bone Scan",
                ("20-25 mCi Tc-99m MDP", "GE Healthcare"),
                ("22 mCi Tc-99m MDP", "Cardinal Health", "Alternative vendor for supply redundancy"),
            ),
            dose_row(
                "Cardiac Stress",
                ("25-30 mCi Tc-99m Sestamibi", "Lantheus"),
                ("28 mCi Tc-99m Sestamibi", "GE Healthcare", "Cost-effective alternative with same quality"),
            ),
            dose_row(
                "Thyroid Scan",
                ("5-10 mCi Tc-99m Pertechnetate", "GE Healthcare"),
                ("8 mCi Tc-99m Pertechnetate", "Cardinal Health", "Secondary source for availability assurance"),
            ),
            dose_row(
                "Renal Scan",
                ("10 mCi Tc-99m MAG3", "Cardinal Health"),
                ("10 mCi Tc-99m MAG3", "GE Healthcare", "Backup vendor with reliable supply chain"),
            ),
            dose_row(
                "DaT Scan",
                ("3-5 mCi I-123 Ioflupane", "GE Healthcare"),
                ("4 mCi I-123 Ioflupane", "Jubilant DraxImage", "Alternative vendor for specialized tracer"),
            ),
            dose_row(
                "Amyloid PET",
                ("10 mCi F-18 Florbetapir", "Lantheus"),
                ("10 mCi F-18 Florbetaben", "GE Healthcare", "Different tracer formulation with similar efficacy"),
            ),
            dose_row(
                "Cardiac PET",
                ("40-60 mCi Rb-82", "Cardinal Health"),
                ("10 mCi N-13 Ammonia", "Triad Isotopes", "Alternative tracer for cardiac perfusion imaging"),
            ),
            dose_row(
                "PSMA PET",
                ("5-8 mCi Ga-68 PSMA-11", "Triad Isotopes"),
                ("6 mCi F-18 PSMA-1007", "Lantheus", "Longer half-life tracer for flexible scheduling"),
            ),
        ];

        let vendors = [
            ("Cardinal Health", 12, 24, 450.0),
            ("GE Healthcare", 12, 48, 425.0),
            ("Lantheus", 6, 24, 475.0),
            ("Triad Isotopes", 12, 36, 440.0),
            ("Jubilant DraxImage", 12, 48, 460.0),
        ]
        .into_iter()
        .map(|(name, term, window, price)| VendorContract {
            name: name.to_string(),
            contract_term_months: term,
            order_window_hours: window,
            unit_price_usd: price,
        })
        .collect();

        let insurance = [
            ("Blue Cross Blue Shield", 95, 14),
            ("Aetna", 92, 21),
            ("Medicare", 100, 30),
            ("United Healthcare", 90, 18),
            ("Cigna", 93, 16),
            ("Humana", 91, 20),
            ("Medicaid", 85, 45),
        ]
        .into_iter()
        .map(|(name, rate, days)| InsuranceReimbursement {
            name: name.to_string(),
            reimbursement_rate_percent: rate,
            avg_processing_days: days,
        })
        .collect();

        let vendor_shares = [("Cardinal Health", 0.40), ("GE Healthcare", 0.35), ("Lantheus", 0.25)]
            .into_iter()
            .map(|(vendor, share)| VendorShare {
                vendor: vendor.to_string(),
                share,
            })
            .collect();

        Self {
            dose_recommendations,
            vendors,
            insurance,
            vendor_shares,
        }
    }

    /// 从 TOML 文件加载，加载后校验
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let tables = Self::from_toml_str(&content)?;
        info!(
            "Loaded reference tables from {} ({} scan types, {} vendors)",
            path.display(),
            tables.dose_recommendations.len(),
            tables.vendors.len()
        );
        Ok(tables)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let tables: ReferenceTables = toml::from_str(content)
            .map_err(|e| RsoError::Config(format!("invalid reference tables: {}", e)))?;
        tables.validate()?;
        Ok(tables)
    }

    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for row in &self.dose_recommendations {
            if row.scan_type.trim().is_empty() {
                return Err(RsoError::Config("scan type cannot be empty".to_string()));
            }
            if !seen.insert(row.scan_type.as_str()) {
                return Err(RsoError::Config(format!("duplicate scan type: {}", row.scan_type)));
            }
        }

        let total_share: f64 = self.vendor_shares.iter().map(|s| s.share).sum();
        if self.vendor_shares.iter().any(|s| !(0.0..=1.0).contains(&s.share)) || total_share > 1.0 + 1e-9 {
            return Err(RsoError::Config(format!(
                "vendor shares must be within [0, 1] and sum to at most 1 (got {:.2})",
                total_share
            )));
        }

        Ok(())
    }

    /// 按检查类型查找剂量推荐，精确匹配，未知类型返回 N/A
    pub fn lookup(&self, scan_type: &str) -> DoseRecommendation {
        self.dose_recommendations
            .iter()
            .find(|row| row.scan_type == scan_type)
            .map(|row| DoseRecommendation {
                primary: row.primary.clone(),
                secondary: row.secondary.clone(),
            })
            .unwrap_or_else(DoseRecommendation::not_available)
    }
}

impl Default for ReferenceTables {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_covers_nine_scan_types() {
        let tables = ReferenceTables::builtin();
        assert_eq!(tables.dose_recommendations.len(), 9);
        assert!(tables.validate().is_ok());
        for row in &tables.dose_recommendations {
            assert!(tables.lookup(&row.scan_type).is_available());
        }
    }

    #[test]
    fn test_pet_ct_lookup() {
        let rec = ReferenceTables::builtin().lookup("PET/CT");
        assert_eq!(rec.primary.dose, "10-15 mCi F-18 FDG");
        assert_eq!(rec.primary.vendor, "Cardinal Health");
        assert_eq!(rec.secondary.dose, "12 mCi F-18 FDG");
        assert_eq!(rec.secondary.vendor, "Triad Isotopes");
    }

    #[test]
    fn test_unknown_scan_falls_back() {
        let rec = ReferenceTables::builtin().lookup("Unknown Scan");
        assert_eq!(rec, DoseRecommendation::not_available());
        assert_eq!(rec.secondary.reason, "No secondary option available");
        assert!(!rec.is_available());
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert!(!ReferenceTables::builtin().lookup("pet/ct").is_available());
    }

    #[test]
    fn test_builtin_vendor_and_insurance_rows() {
        let tables = ReferenceTables::builtin();
        assert_eq!(tables.vendors.len(), 5);
        let lantheus = tables.vendors.iter().find(|v| v.name == "Lantheus").unwrap();
        assert_eq!(lantheus.contract_term_months, 6);
        assert_eq!(lantheus.unit_price_usd, 475.0);
        assert_eq!(tables.insurance.len(), 7);
        assert_eq!(tables.insurance.last().unwrap().avg_processing_days, 45);
    }

    #[test]
    fn test_toml_round_trip() {
        let tables = ReferenceTables::builtin();
        let text = toml::to_string(&tables).unwrap();
        let parsed = ReferenceTables::from_toml_str(&text).unwrap();
        assert_eq!(parsed, tables);
    }

    #[test]
    fn test_duplicate_scan_type_rejected() {
        let mut tables = ReferenceTables::builtin();
        let dup = tables.dose_recommendations[0].clone();
        tables.dose_recommendations.push(dup);
        assert!(matches!(tables.validate(), Err(RsoError::Config(_))));
    }

    #[test]
    fn test_oversubscribed_shares_rejected() {
        let mut tables = ReferenceTables::builtin();
        tables.vendor_shares[0].share = 0.9;
        assert!(tables.validate().is_err());
    }
}
