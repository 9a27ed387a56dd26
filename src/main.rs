#[cfg(target_os = "espidf")]
mod firmware {
    use std::net::{Ipv4Addr, TcpListener};

    use esp_idf_svc::eth::{BlockingEth, EspEth, EthDriver, EthEvent, RmiiClockConfig, RmiiEthChipset};
    use esp_idf_svc::eventloop::EspSystemEventLoop;
    use esp_idf_svc::hal::delay::{Delay, FreeRtos};
    use esp_idf_svc::hal::gpio::{self, PinDriver, Pull};
    use esp_idf_svc::hal::ledc::{config::TimerConfig, LedcDriver, LedcTimerDriver, Resolution};
    use esp_idf_svc::hal::peripheral::Peripheral;
    use esp_idf_svc::hal::peripherals::Peripherals;
    use esp_idf_svc::hal::prelude::*;
    use esp_idf_svc::ipv4;
    use esp_idf_svc::netif::{EspNetif, NetifConfiguration};

    use tv_lift::config::{self, MotionConfig};
    use tv_lift::http_api;
    use tv_lift::{HBridge, LimitSwitchBank, MotionExecutor};

    pub fn main() {
        // It is necessary to call this function once. Otherwise, some patches to the runtime
        // implemented by esp-idf-sys might not link properly. See https://github.com/esp-rs/esp-idf-template/issues/71
        esp_idf_svc::sys::link_patches();

        // Bind the log crate to the ESP Logging facilities
        esp_idf_svc::log::EspLogger::initialize_default();

        log::info!("TV lift controller starting");

        if let Err(e) = run_app() {
            log::error!("App error: {}", e);
            log::info!("System halted. Restarting in 10 seconds...");
            FreeRtos::delay_ms(10000);
            esp_idf_svc::hal::reset::restart();
        }
    }

    fn limit_input<'d, T>(pin: impl Peripheral<P = T> + 'd) -> anyhow::Result<PinDriver<'d, T, gpio::Input>>
    where
        T: gpio::InputPin + gpio::OutputPin,
    {
        let mut driver = PinDriver::input(pin)?;
        driver.set_pull(Pull::Up)?;
        Ok(driver)
    }

    fn run_app() -> anyhow::Result<()> {
        let sysloop = EspSystemEventLoop::take()?;
        let peripherals = Peripherals::take()?;
        let p = peripherals.pins;

        // motor driver: IN3 = GPIO13, IN4 = GPIO16, ENA = GPIO4
        let in3 = PinDriver::output(p.gpio13)?;
        let in4 = PinDriver::output(p.gpio16)?;
        let pwm_timer = LedcTimerDriver::new(
            peripherals.ledc.timer0,
            &TimerConfig::default()
                .frequency(config::PWM_FREQUENCY_HZ.Hz())
                .resolution(Resolution::Bits8),
        )?;
        let ena = LedcDriver::new(peripherals.ledc.channel0, &pwm_timer, p.gpio4)?;
        let motor = HBridge::new(in3, in4, ena);

        // limit switches: UR = GPIO15, LR = GPIO5, UL = GPIO2, LL = GPIO14
        let switches = LimitSwitchBank::new(
            limit_input(p.gpio15)?,
            limit_input(p.gpio5)?,
            limit_input(p.gpio2)?,
            limit_input(p.gpio14)?,
        );

        let motion_config = MotionConfig::default();
        log::info!("Motion config: {}", serde_json::to_string(&motion_config)?);

        let mut executor = MotionExecutor::new(motor, switches, motion_config);
        executor.halt()?;

        // setup ethernet
        let _eth_subscription = sysloop.subscribe::<EthEvent, _>(|event| {
            log::info!("Ethernet event: {:?}", event);
        })?;

        let netif = EspNetif::new_with_conf(&NetifConfiguration {
            ip_configuration: Some(ipv4::Configuration::Client(ipv4::ClientConfiguration::Fixed(
                ipv4::ClientSettings {
                    ip: config::LOCAL_IP,
                    subnet: ipv4::Subnet {
                        gateway: config::GATEWAY,
                        mask: ipv4::Mask(config::SUBNET_PREFIX),
                    },
                    dns: Some(config::DNS_PRIMARY),
                    secondary_dns: Some(config::DNS_SECONDARY),
                },
            ))),
            ..NetifConfiguration::eth_default_client()
        })?;

        let driver = EthDriver::new_rmii(
            peripherals.mac,
            p.gpio25,
            p.gpio26,
            p.gpio27,
            p.gpio23,
            p.gpio22,
            p.gpio21,
            p.gpio19,
            p.gpio18,
            RmiiClockConfig::<gpio::Gpio0, gpio::Gpio16, gpio::Gpio17>::Input(p.gpio0),
            Option::<gpio::AnyOutputPin>::None,
            RmiiEthChipset::LAN87XX,
            Some(0),
            sysloop.clone(),
        )?;
        let mut eth = EspEth::wrap_all(driver, netif)?;
        eth.netif_mut().set_hostname(config::HOSTNAME)?;

        let mut eth = BlockingEth::wrap(eth, sysloop.clone())?;
        eth.start()?;
        eth.wait_netif_up()?;

        let ip_info = eth.eth().netif().get_ip_info()?;
        log::info!("Ethernet up, hostname: {}, IPv4: {}", config::HOSTNAME, ip_info.ip);

        // setup http api
        let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, config::HTTP_PORT))?;
        let mut delay = Delay::new_default();
        http_api::serve(listener, &mut executor, &mut delay)
    }
}

#[cfg(target_os = "espidf")]
fn main() {
    firmware::main();
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    eprintln!("tv-lift only runs on ESP-IDF targets; use `cargo test` to exercise the library on a host.");
}
