pub mod data {
    pub mod datasources {
        pub mod payment_queue_datasource;
    }
    pub mod models {
        pub mod payment_discount_model;
        pub mod payment_model;
        pub mod purchase_option_model;
    }
    pub mod repositories {
        pub mod payment_orchestrator_impl;
        pub mod pending_requests;
        pub mod product_provider_impl;
    }
}

pub mod domain {
    pub mod entities {
        pub mod locale;
        pub mod payment;
        pub mod product;
        pub mod promotional_offer;
        pub mod store_environment;
        pub mod store_transaction;
    }
    pub mod providers {
        pub mod payment_orchestrator;
        pub mod product_provider;
    }
}

pub mod client;
pub mod errors;
