pub mod reconcile;
pub mod split;
pub mod verify;
