pub mod assessment;
pub mod protocol;
pub mod reference;
pub mod symptom;
