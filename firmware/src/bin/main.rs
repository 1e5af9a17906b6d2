#![no_std]
#![no_main]

use defmt::{info, warn};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_futures::select::{select, Either};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::{UART0, USB};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_rp::usb::Driver;
use embassy_time::{Delay, Instant, Timer};
use embassy_usb::class::hid::State;
use embassy_usb::{Builder, Config as UsbConfig, UsbDevice};
use static_cell::StaticCell;
use uart_to_hid::usb_state::{REMOTE_WAKEUP, STATUS_EVENTS};
use uart_to_hid::{
    configure_usb_hid, HidBridge, KeyboardLedHandler, StatusIndicator, UartByteSource,
    UsbHidSink, UsbStateHandler, BAUD_RATE, RX_BUFFER_SIZE,
};

#[cfg(feature = "dev-panic")]
use panic_probe as _;
#[cfg(feature = "prod-panic")]
use panic_reset as _;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    USBCTRL_IRQ => embassy_rp::usb::InterruptHandler<USB>;
});

type Bridge = HidBridge<UartByteSource, UsbHidSink<'static>, Delay>;

/// UART ring buffers.
static UART_TX_BUF: StaticCell<[u8; 16]> = StaticCell::new();
static UART_RX_BUF: StaticCell<[u8; RX_BUFFER_SIZE]> = StaticCell::new();

/// USB device configuration buffer.
static CONFIG_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static BOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static MSOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static CONTROL_BUF: StaticCell<[u8; 64]> = StaticCell::new();

/// HID state and handlers.
static HID_STATE: StaticCell<State> = StaticCell::new();
static LED_HANDLER: StaticCell<KeyboardLedHandler> = StaticCell::new();
static USB_HANDLER: StaticCell<UsbStateHandler> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("UART-to-HID starting...");

    let p = embassy_rp::init(embassy_rp::config::Config::default());

    // --- UART Setup ---
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = BAUD_RATE;

    let uart_tx_buf = UART_TX_BUF.init([0; 16]);
    let uart_rx_buf = UART_RX_BUF.init([0; RX_BUFFER_SIZE]);
    let uart = Uart::new_blocking(
        p.UART0,
        p.PIN_0, // TX
        p.PIN_1, // RX
        uart_config,
    )
    .into_buffered(Irqs, uart_tx_buf, uart_rx_buf);
    let (_tx, rx) = uart.split();
    let uart_input = UartByteSource::new(rx);

    // --- USB Setup ---
    let usb_driver = Driver::new(p.USB, Irqs);

    let mut usb_config = UsbConfig::new(0xCAFE, 0x4004);
    usb_config.manufacturer = Some("Rust HID Bridge");
    usb_config.product = Some("UART-to-HID Bridge");
    usb_config.serial_number = Some("001");
    usb_config.max_power = 100;
    usb_config.max_packet_size_0 = 64;
    usb_config.supports_remote_wakeup = true;

    let config_descriptor = CONFIG_DESCRIPTOR.init([0; 256]);
    let bos_descriptor = BOS_DESCRIPTOR.init([0; 256]);
    let msos_descriptor = MSOS_DESCRIPTOR.init([0; 256]);
    let control_buf = CONTROL_BUF.init([0; 64]);

    let mut builder = Builder::new(
        usb_driver,
        usb_config,
        config_descriptor,
        bos_descriptor,
        msos_descriptor,
        control_buf,
    );
    builder.handler(USB_HANDLER.init(UsbStateHandler));

    // Configure HID class
    let hid_state = HID_STATE.init(State::new());
    let led_handler = LED_HANDLER.init(KeyboardLedHandler::new());
    let hid_writer = configure_usb_hid(&mut builder, hid_state, led_handler);

    // Build the USB device
    let usb_device = builder.build();

    let bridge = HidBridge::new(uart_input, UsbHidSink::new(hid_writer), Delay);

    // On-board LED on Pico
    let led = Output::new(p.PIN_25, Level::Low);

    // Spawn tasks (unwrap the SpawnToken, then spawn)
    spawner.spawn(usb_task(usb_device).unwrap());
    spawner.spawn(bridge_task(bridge).unwrap());
    spawner.spawn(status_task(led).unwrap());

    info!("UART-to-HID initialized, waiting for frames...");
}

/// USB device task - runs the USB stack and handles remote wakeup.
#[embassy_executor::task]
async fn usb_task(mut device: UsbDevice<'static, Driver<'static, USB>>) {
    loop {
        device.run_until_suspend().await;
        match select(device.wait_resume(), REMOTE_WAKEUP.wait()).await {
            Either::First(()) => {
                // Host resumed on its own; a request raised while suspended is moot.
                REMOTE_WAKEUP.reset();
            }
            Either::Second(()) => {
                info!("Requesting remote wakeup");
                if let Err(e) = device.remote_wakeup().await {
                    warn!("Remote wakeup failed: {:?}", e);
                }
            }
        }
    }
}

/// Bridge task - parses UART frames and sends HID reports.
#[embassy_executor::task]
async fn bridge_task(mut bridge: Bridge) {
    bridge.run().await
}

/// Status task - drives the LED from USB state and the host's CapsLock.
#[embassy_executor::task]
async fn status_task(mut led: Output<'static>) {
    let mut status = StatusIndicator::new(Instant::now());

    loop {
        let next = status.next_toggle().unwrap_or(Instant::MAX);
        if let Either::First(event) = select(STATUS_EVENTS.receive(), Timer::at(next)).await {
            status.apply(event);
        }
        led.set_level(Level::from(status.poll(Instant::now())));
    }
}
