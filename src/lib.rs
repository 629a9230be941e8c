//! # Macro Outlook
//!
//! Workspace facade re-exporting the indicator pipeline
//! ([`macro_forecast`]) and its numerical kernels ([`outlook_math`]).
//!
//! ## Example
//!
//! ```
//! use macro_outlook_workspace::{merge, IndicatorTable, RawRecord};
//!
//! let gdp = IndicatorTable::build(&[RawRecord::new(2011, Some(2.0)), RawRecord::new(2010, Some(1.0))]);
//! let cpi = IndicatorTable::build(&[RawRecord::new(2012, Some(7.5))]);
//!
//! let merged = merge(&[("GDP".to_string(), gdp), ("Inflation".to_string(), cpi)]).unwrap();
//! assert_eq!(merged.years(), vec![2010, 2011, 2012]);
//! assert_eq!(merged.value("Inflation", 2010), None);
//! ```

pub use macro_forecast::*;
pub use outlook_math;
