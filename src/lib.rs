pub mod config;
pub mod files;
pub mod i18n;
pub mod lint;
pub mod merge;
pub mod reference;
pub mod remote;
pub mod retry;
pub mod xliff;
