// Portfolio assembly: a three-stage wizard (resume -> template -> customize)
// that snapshots parsed resume content into a published portfolio record.

pub mod handlers;
pub mod wizard;
