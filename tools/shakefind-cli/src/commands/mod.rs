pub mod check;
pub mod preview;
pub mod replay;
pub mod run;
