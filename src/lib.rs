// Crate entry point. Re-export modules so tests and binaries can import them easily.
//
// Responsibilities
// - Only declare and expose modules. No business logic here.
//
// How it is used
// - Tests and the shell binary import modules from this crate root.

pub mod modules {
    pub mod tasks {
        pub mod core {
            pub mod labor;
            pub mod model;
        }
        pub mod ports;
        pub mod service;
        pub mod adapters {
            pub mod in_memory;
            pub mod postgres;
        }
        pub mod inbound {
            pub mod http;
        }
    }
    pub mod users {
        pub mod core {
            pub mod model;
        }
        pub mod ports;
        pub mod service;
        pub mod adapters {
            pub mod in_memory;
            pub mod people_api;
            pub mod postgres;
        }
        pub mod inbound {
            pub mod http;
        }
    }
}

pub mod shell;
