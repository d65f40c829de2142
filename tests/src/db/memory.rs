use tether::driver::Driver;
use tether_driver_memory::Memory;

use crate::Setup;

pub struct SetupMemory;

impl Setup for SetupMemory {
    fn driver(&self) -> Box<dyn Driver> {
        Box::new(Memory::new())
    }
}
