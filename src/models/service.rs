use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ServiceItem {
    pub id: u32,
    pub name: &'static str,
    pub price: u32,
}

pub const CATALOG: [ServiceItem; 3] = [
    ServiceItem {
        id: 1,
        name: "Haircut",
        price: 100,
    },
    ServiceItem {
        id: 2,
        name: "Beard Trim",
        price: 200,
    },
    ServiceItem {
        id: 3,
        name: "Full Combo",
        price: 250,
    },
];
