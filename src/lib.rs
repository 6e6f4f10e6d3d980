//! Statutory Payroll Engine for Indian payroll
//!
//! This crate computes income tax under the old and new regimes, statutory
//! deductions (PF, ESIC, professional tax), month-by-month TDS, gratuity and
//! full-and-final settlements. Every calculation is a pure function of its
//! inputs and the loaded [`config::TaxConfig`].

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod settings;
