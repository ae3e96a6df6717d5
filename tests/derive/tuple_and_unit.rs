use accessors::*;

#[derive(Accessors)]
pub struct Meters(pub f64);

#[derive(Accessors)]
pub struct Marker;

#[derive(Accessors)]
pub struct Pair<A, B>(pub A, pub B);

fn main() {
    assert_eq!(Meters(2.5).to_accessor_map().value::<f64>("0"), Ok(2.5));
    assert!(Marker.to_accessor_array().is_empty());
    let pair = Pair(1u8, "x".to_string());
    assert_eq!(pair.to_accessor_array().column_names(), &["0", "1"]);
}
