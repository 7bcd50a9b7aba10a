use crate::domain::model::{ListedVehicle, Vehicle};
use crate::domain::ports::Storage;
use crate::utils::error::{LookupError, Result};
use crate::utils::validation::validate_non_empty_string;

/// Read side of the persisted vehicle list.
pub struct VehicleStore<S: Storage> {
    storage: S,
    path: String,
}

pub fn default_vehicles() -> Vec<ListedVehicle> {
    vec![
        ListedVehicle {
            make: "Chevrolet".to_string(),
            model: "Camaro".to_string(),
            selected: true,
        },
        ListedVehicle {
            make: "Lamborghini".to_string(),
            model: "Aventador".to_string(),
            selected: true,
        },
    ]
}

impl<S: Storage> VehicleStore<S> {
    pub fn new(storage: S, path: impl Into<String>) -> Self {
        Self {
            storage,
            path: path.into(),
        }
    }

    /// Loads the list, falling back to the default list when the file is
    /// missing or cannot be parsed.
    pub async fn load(&self) -> Result<Vec<ListedVehicle>> {
        let data = match self.storage.read_file(&self.path).await {
            Ok(data) => data,
            Err(LookupError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No vehicle list at '{}', using defaults", self.path);
                return Ok(default_vehicles());
            }
            Err(e) => return Err(e),
        };

        match serde_json::from_slice::<Vec<ListedVehicle>>(&data) {
            Ok(list) => {
                tracing::debug!("Loaded {} vehicles from '{}'", list.len(), self.path);
                Ok(list)
            }
            Err(e) => {
                tracing::warn!("Vehicle list '{}' is unreadable ({}), using defaults", self.path, e);
                Ok(default_vehicles())
            }
        }
    }

    pub async fn selected(&self) -> Result<Vec<Vehicle>> {
        Ok(selected_vehicles(&self.load().await?))
    }
}

pub fn selected_vehicles(list: &[ListedVehicle]) -> Vec<Vehicle> {
    list.iter()
        .filter(|v| v.selected)
        .map(ListedVehicle::vehicle)
        .collect()
}

/// Parses a `MAKE:MODEL` command line value. Both halves are trimmed and
/// must be non-empty.
pub fn parse_vehicle_arg(value: &str) -> Result<Vehicle> {
    let (make, model) = value.split_once(':').ok_or_else(|| LookupError::InvalidConfigValueError {
        field: "vehicle".to_string(),
        value: value.to_string(),
        reason: "Expected MAKE:MODEL".to_string(),
    })?;
    validate_non_empty_string("vehicle.make", make)?;
    validate_non_empty_string("vehicle.model", model)?;
    Ok(Vehicle::new(make.trim(), model.trim()))
}
