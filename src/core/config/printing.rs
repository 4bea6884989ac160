use crate::core::config::data::{path_display, Config};

impl Config {
    pub fn print_all(&self) {
        println!("Current configuration:");
        match &self.backend_route {
            Some(route) => println!("  backend-route: {route}"),
            None => println!("  backend-route: (unset, {})", self.backend_route_or_default()),
        }
        match self.default_mode {
            Some(mode) => println!("  default-mode: {mode}"),
            None => println!("  default-mode: (unset, {})", self.default_mode_or_default()),
        }
        match &self.storage_key {
            Some(key) => println!("  storage-key: {key}"),
            None => println!("  storage-key: (unset, {})", self.storage_key_or_default()),
        }
        match &self.data_dir {
            Some(dir) => println!("  data-dir: {}", path_display(dir)),
            None => println!("  data-dir: (unset)"),
        }
    }
}
