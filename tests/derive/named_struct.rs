use accessors::*;

#[derive(Accessors)]
#[accessors(rename_all = "camelCase", properties(display_name: String))]
pub struct Customer {
    pub first_name: String,
    pub last_name: String,
    #[accessors(rename = "id")]
    pub customer_id: u64,
    #[accessors(skip)]
    pub password_hash: Vec<u8>,
    loyalty_points: u32,
}

impl Customer {
    fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

fn main() {
    let customer = Customer {
        first_name: "Ann".to_string(),
        last_name: "Lee".to_string(),
        customer_id: 7,
        password_hash: vec![],
        loyalty_points: 3,
    };
    let _ = customer.loyalty_points;
    let array = customer.to_accessor_array();
    assert_eq!(array.column_names(), &["firstName", "lastName", "id", "displayName"]);
}
