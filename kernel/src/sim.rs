//! In-memory stand-in for the kernel, used by the unit tests.
//!
//! Records every call the driver makes, backs `memremap` with a heap buffer
//! and binds drivers to devices by name. Faults can be injected per call.

use std::fmt;
use std::ptr::NonNull;

use spin::Mutex;
use uapi::{FbFixScreeninfo, FbVarScreeninfo};

use crate::display::{Drawing, FbInfo};
use crate::error::{Errno, KResult};
use crate::host::{Host, MemremapFlags, PhysRegion};
use crate::logging::LogLevel;
use crate::platform::{DeviceHandle, PlatformDriver};

const VRAM_POISON: u8 = 0xa5;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Call {
    RequestMemRegion(PhysRegion),
    ReleaseMemRegion(PhysRegion),
    Memremap(PhysRegion, MemremapFlags),
    Memunmap,
    FramebufferAlloc,
    FramebufferRelease,
    RegisterFramebuffer,
    UnregisterFramebuffer,
    DeviceAlloc(String),
    DeviceAdd(String),
    DevicePut(String),
    DeviceUnregister(String),
    DriverRegister(String),
    DriverUnregister(String),
    SetDrvdata(String),
    TakeDrvdata(String),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Fault {
    RequestMemRegion,
    Memremap,
    FramebufferAlloc,
    RegisterFramebuffer(Errno),
    DeviceAlloc,
    DeviceAdd(Errno),
    DriverRegister(Errno),
}

/// Copy of the interesting parts of a bound fb_info.
#[derive(Debug)]
pub struct FbView {
    pub fix: FbFixScreeninfo,
    pub var: FbVarScreeninfo,
    pub flags: u32,
    pub node: i32,
    pub drawing: Option<Drawing>,
}

struct SimDevice {
    name: String,
    id: i32,
    added: bool,
    bound_to: Option<String>,
}

#[derive(Default)]
struct State {
    calls: Vec<Call>,
    logs: Vec<(LogLevel, String)>,
    faults: Vec<Fault>,
    reserved: Vec<PhysRegion>,
    vram: Vec<u8>,
    mapped: bool,
    live_framebuffers: usize,
    registered: Vec<i32>,
    next_node: i32,
    devices: Vec<SimDevice>,
    drivers: Vec<PlatformDriver<SimHost>>,
    drvdata: Vec<(String, Box<FbInfo>)>,
}

impl State {
    fn take_fault(&mut self, pred: impl Fn(&Fault) -> bool) -> Option<Fault> {
        let idx = self.faults.iter().position(pred)?;
        Some(self.faults.remove(idx))
    }

    fn device_mut(&mut self, name: &str) -> Option<&mut SimDevice> {
        self.devices.iter_mut().find(|d| d.name == name)
    }
}

pub struct SimHost {
    state: Mutex<State>,
}

impl SimHost {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
        }
    }

    /// Make the next matching call fail once.
    pub fn inject(&self, fault: Fault) {
        self.state.lock().faults.push(fault);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    pub fn logs(&self) -> Vec<(LogLevel, String)> {
        self.state.lock().logs.clone()
    }

    pub fn vram(&self) -> Vec<u8> {
        self.state.lock().vram.clone()
    }

    pub fn mapped(&self) -> bool {
        self.state.lock().mapped
    }

    pub fn region_reserved(&self, region: PhysRegion) -> bool {
        self.state.lock().reserved.contains(&region)
    }

    pub fn registered_nodes(&self) -> Vec<i32> {
        self.state.lock().registered.clone()
    }

    pub fn live_framebuffers(&self) -> usize {
        self.state.lock().live_framebuffers
    }

    pub fn device_count(&self) -> usize {
        self.state.lock().devices.len()
    }

    pub fn is_bound(&self, dev_name: &str) -> bool {
        self.state
            .lock()
            .devices
            .iter()
            .any(|d| d.name == dev_name && d.bound_to.is_some())
    }

    pub fn drvdata(&self, dev_name: &str) -> Option<FbView> {
        let state = self.state.lock();
        let (_, info) = state.drvdata.iter().find(|(name, _)| name == dev_name)?;
        Some(FbView {
            fix: info.fix,
            var: info.var,
            flags: info.flags,
            node: info.node,
            drawing: info.fbops.map(|ops| ops.drawing),
        })
    }

    /// What FBIOPUT_VSCREENINFO does in the fbdev core: validate through
    /// the driver, then apply.
    pub fn set_var(&self, dev_name: &str, var: &FbVarScreeninfo) -> KResult {
        let mut state = self.state.lock();
        let (_, info) = state
            .drvdata
            .iter_mut()
            .find(|(name, _)| name == dev_name)
            .ok_or(Errno::ENODEV)?;
        info.check_var(var)?;
        info.var = *var;
        Ok(())
    }

    /// Probe `dev_name` with the first matching driver. Runs without the
    /// lock held because the driver calls back into the host.
    fn bind(&self, dev_name: &str, id: i32) {
        let Some(handle) = DeviceHandle::new(base_name(dev_name, id), id) else {
            return;
        };
        let driver = self
            .state
            .lock()
            .drivers
            .iter()
            .copied()
            .find(|drv| drv.matches(&handle));
        let Some(driver) = driver else { return };

        if (driver.probe)(self, &handle).is_ok() {
            if let Some(dev) = self.state.lock().device_mut(dev_name) {
                dev.bound_to = Some(driver.name.to_string());
            }
        }
    }

    fn unbind(&self, dev_name: &str, id: i32) {
        let driver = {
            let mut state = self.state.lock();
            let Some(bound_to) = state.device_mut(dev_name).and_then(|d| d.bound_to.take()) else {
                return;
            };
            state.drivers.iter().copied().find(|drv| drv.name == bound_to)
        };
        let Some(driver) = driver else { return };
        if let Some(handle) = DeviceHandle::new(base_name(dev_name, id), id) {
            (driver.remove)(self, &handle);
        }
    }
}

fn base_name(dev_name: &str, id: i32) -> &str {
    if id == crate::platform::PLATFORM_DEVID_NONE {
        dev_name
    } else {
        dev_name.rsplit_once('.').map_or(dev_name, |(base, _)| base)
    }
}

impl Host for SimHost {
    fn log(&self, level: LogLevel, dev: Option<&DeviceHandle>, args: fmt::Arguments<'_>) {
        let line = match dev {
            Some(dev) => format!("{}: {}", dev.name(), args),
            None => args.to_string(),
        };
        self.state.lock().logs.push((level, line));
    }

    fn request_mem_region(&self, region: PhysRegion, _name: &'static str) -> bool {
        let mut state = self.state.lock();
        state.calls.push(Call::RequestMemRegion(region));
        if state.take_fault(|f| *f == Fault::RequestMemRegion).is_some() {
            return false;
        }
        if state.reserved.iter().any(|r| r.overlaps(&region)) {
            return false;
        }
        state.reserved.push(region);
        true
    }

    fn release_mem_region(&self, region: PhysRegion) {
        let mut state = self.state.lock();
        state.calls.push(Call::ReleaseMemRegion(region));
        state.reserved.retain(|r| *r != region);
    }

    fn memremap(&self, region: PhysRegion, flags: MemremapFlags) -> Option<NonNull<u8>> {
        let mut state = self.state.lock();
        state.calls.push(Call::Memremap(region, flags));
        if state.take_fault(|f| *f == Fault::Memremap).is_some() {
            return None;
        }
        assert!(!state.mapped, "window mapped twice");
        state.vram = vec![VRAM_POISON; region.len];
        state.mapped = true;
        NonNull::new(state.vram.as_mut_ptr())
    }

    fn memunmap(&self, addr: NonNull<u8>) {
        let mut state = self.state.lock();
        state.calls.push(Call::Memunmap);
        assert!(state.mapped, "memunmap without a mapping");
        assert_eq!(addr.as_ptr(), state.vram.as_mut_ptr(), "memunmap of a foreign pointer");
        state.mapped = false;
    }

    fn framebuffer_alloc(&self, _parent: &DeviceHandle) -> Option<Box<FbInfo>> {
        let mut state = self.state.lock();
        state.calls.push(Call::FramebufferAlloc);
        if state.take_fault(|f| *f == Fault::FramebufferAlloc).is_some() {
            return None;
        }
        state.live_framebuffers += 1;
        Some(Box::new(FbInfo::new()))
    }

    fn framebuffer_release(&self, info: Box<FbInfo>) {
        let mut state = self.state.lock();
        state.calls.push(Call::FramebufferRelease);
        assert!(info.screen_base.is_none(), "fb_info released while still mapped");
        state.live_framebuffers -= 1;
    }

    fn register_framebuffer(&self, info: &mut FbInfo) -> KResult {
        let mut state = self.state.lock();
        state.calls.push(Call::RegisterFramebuffer);
        if let Some(Fault::RegisterFramebuffer(err)) =
            state.take_fault(|f| matches!(f, Fault::RegisterFramebuffer(_)))
        {
            return Err(err);
        }
        info.node = state.next_node;
        state.next_node += 1;
        state.registered.push(info.node);
        Ok(())
    }

    fn unregister_framebuffer(&self, info: &mut FbInfo) {
        let mut state = self.state.lock();
        state.calls.push(Call::UnregisterFramebuffer);
        state.registered.retain(|&node| node != info.node);
    }

    fn platform_device_alloc(&self, name: &'static str, id: i32) -> Option<DeviceHandle> {
        let mut state = self.state.lock();
        state.calls.push(Call::DeviceAlloc(name.to_string()));
        if state.take_fault(|f| *f == Fault::DeviceAlloc).is_some() {
            return None;
        }
        let handle = DeviceHandle::new(name, id)?;
        state.devices.push(SimDevice {
            name: handle.name().to_string(),
            id,
            added: false,
            bound_to: None,
        });
        Some(handle)
    }

    fn platform_device_add(&self, dev: &DeviceHandle) -> KResult {
        {
            let mut state = self.state.lock();
            state.calls.push(Call::DeviceAdd(dev.name().to_string()));
            if let Some(Fault::DeviceAdd(err)) =
                state.take_fault(|f| matches!(f, Fault::DeviceAdd(_)))
            {
                return Err(err);
            }
            let sim_dev = state.device_mut(dev.name()).ok_or(Errno::ENODEV)?;
            if sim_dev.added {
                return Err(Errno::EEXIST);
            }
            sim_dev.added = true;
        }
        self.bind(dev.name(), dev.id());
        Ok(())
    }

    fn platform_device_put(&self, dev: DeviceHandle) {
        let mut state = self.state.lock();
        state.calls.push(Call::DevicePut(dev.name().to_string()));
        state.devices.retain(|d| d.name != dev.name());
    }

    fn platform_device_unregister(&self, dev: DeviceHandle) {
        self.state
            .lock()
            .calls
            .push(Call::DeviceUnregister(dev.name().to_string()));
        self.unbind(dev.name(), dev.id());
        self.state.lock().devices.retain(|d| d.name != dev.name());
    }

    fn platform_driver_register(&self, drv: PlatformDriver<Self>) -> KResult {
        let pending: Vec<(String, i32)> = {
            let mut state = self.state.lock();
            state.calls.push(Call::DriverRegister(drv.name.to_string()));
            if let Some(Fault::DriverRegister(err)) =
                state.take_fault(|f| matches!(f, Fault::DriverRegister(_)))
            {
                return Err(err);
            }
            if state.drivers.iter().any(|d| d.name == drv.name) {
                return Err(Errno::EBUSY);
            }
            state.drivers.push(drv);
            state
                .devices
                .iter()
                .filter(|d| d.added && d.bound_to.is_none())
                .map(|d| (d.name.clone(), d.id))
                .collect()
        };
        // A failing probe leaves the device unbound but the driver registered.
        for (name, id) in pending {
            self.bind(&name, id);
        }
        Ok(())
    }

    fn platform_driver_unregister(&self, drv: &PlatformDriver<Self>) {
        let bound: Vec<(String, i32)> = {
            let mut state = self.state.lock();
            state.calls.push(Call::DriverUnregister(drv.name.to_string()));
            state
                .devices
                .iter()
                .filter(|d| d.bound_to.as_deref() == Some(drv.name))
                .map(|d| (d.name.clone(), d.id))
                .collect()
        };
        for (name, id) in bound {
            self.unbind(&name, id);
        }
        self.state.lock().drivers.retain(|d| d.name != drv.name);
    }

    fn platform_set_drvdata(&self, dev: &DeviceHandle, data: Box<FbInfo>) {
        let mut state = self.state.lock();
        state.calls.push(Call::SetDrvdata(dev.name().to_string()));
        state.drvdata.retain(|(name, _)| name != dev.name());
        state.drvdata.push((dev.name().to_string(), data));
    }

    fn platform_take_drvdata(&self, dev: &DeviceHandle) -> Option<Box<FbInfo>> {
        let mut state = self.state.lock();
        state.calls.push(Call::TakeDrvdata(dev.name().to_string()));
        let idx = state.drvdata.iter().position(|(name, _)| name == dev.name())?;
        Some(state.drvdata.remove(idx).1)
    }
}
